//! Textual solution writer: instance name on line 1, then one line per
//! vehicle listing its route's node indices (depot omitted), blank for an
//! empty route. Pure formatting — a `Solution` satisfying the invariants
//! always has exactly `nK` routes, so there's no fallible path of its own.

use crate::solution::Solution;
use std::io::{self, Write};

pub fn write_solution<W: Write>(writer: &mut W, instance_name: &str, solution: &Solution) -> io::Result<()> {
    writeln!(writer, "{instance_name}")?;
    for route in solution.routes() {
        let line = route
            .nodes()
            .iter()
            .map(|node| node.index().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

pub fn format_solution(instance_name: &str, solution: &Solution) -> String {
    let mut buf = Vec::new();
    write_solution(&mut buf, instance_name, solution).expect("writing to a Vec<u8> never fails");
    String::from_utf8(buf).expect("formatted solution is always valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Instance;
    use crate::solution::Route;
    use crate::types::{Fairness, RequestId};

    #[test]
    fn writes_one_line_per_vehicle_with_blank_for_empty_route() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 0.0), (0.0, 2.0)];
        let instance = Instance::from_raw(2, 2, 10, 2, 0.0, Fairness::Jain, vec![3, 5], coords).unwrap();
        let r1 = RequestId::from_index(0);
        let r2 = RequestId::from_index(1);
        let route0 = Route::from_nodes(
            &instance,
            vec![instance.pickup_node(r1), instance.pickup_node(r2), instance.delivery_node(r1), instance.delivery_node(r2)],
        );
        let route1 = Route::empty();
        let solution = Solution::from_routes(&instance, vec![route0, route1]);

        let text = format_solution("toy", &solution);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "toy");
        assert_eq!(lines[1], "1 2 3 4");
        assert_eq!(lines[2], "");
        assert!(!text.contains('0'));
    }
}
