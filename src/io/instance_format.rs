//! Textual instance format parser, grounded on the original C++ loader's
//! marker-then-token-stream grammar: a five-number header, a `# demands`
//! section, and a `# request locations` section, each scanned for rather
//! than assumed to be on a fixed line.

use crate::error::InstanceError;
use crate::problem::Instance;
use crate::types::{Coord, Demand, Fairness};

fn malformed(msg: impl Into<String>) -> InstanceError {
    InstanceError::Malformed(msg.into())
}

/// Parses the `n nK C gamma rho` header and everything that follows it.
/// `fairness` isn't part of the textual grammar (the reference format
/// predates per-instance fairness selection) and is supplied by the caller,
/// typically from a CLI flag.
pub fn parse_instance(text: &str, fairness: Fairness) -> Result<Instance, InstanceError> {
    let mut tokens = text.split_whitespace().peekable();
    let lines: Vec<&str> = text.lines().collect();

    let n: usize = next_token(&mut tokens, "n")?;
    let n_vehicles: usize = next_token(&mut tokens, "nK")?;
    let capacity: Demand = next_token(&mut tokens, "C")?;
    let gamma: usize = next_token(&mut tokens, "gamma")?;
    let rho: f64 = next_token(&mut tokens, "rho")?;

    let demands_start = find_marker(&lines, "# demands")?;
    let mut demand_tokens = lines[demands_start + 1..].iter().flat_map(|l| l.split_whitespace());
    let mut demands = Vec::with_capacity(n);
    for _ in 0..n {
        let tok = demand_tokens
            .next()
            .ok_or_else(|| malformed("ran out of demand tokens before collecting n demands"))?;
        let value: Demand = tok
            .parse()
            .map_err(|_| malformed(format!("non-numeric demand token '{tok}'")))?;
        demands.push(value);
    }

    let locations_start = find_marker(&lines, "# request locations")?;
    let num_nodes = 2 * n + 1;
    let mut coords = Vec::with_capacity(num_nodes);
    let mut location_lines = lines[locations_start + 1..]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty());
    for _ in 0..num_nodes {
        let line = location_lines
            .next()
            .ok_or_else(|| malformed("ran out of coordinate lines before collecting 1+2n locations"))?;
        let mut parts = line.split_whitespace();
        let x: Coord = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(format!("malformed coordinate line '{line}'")))?;
        let y: Coord = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| malformed(format!("malformed coordinate line '{line}'")))?;
        coords.push((x, y));
    }

    Instance::from_raw(n, n_vehicles, capacity, gamma, rho, fairness, demands, coords)
}

fn next_token<T: std::str::FromStr>(
    tokens: &mut std::iter::Peekable<std::str::SplitWhitespace>,
    field: &str,
) -> Result<T, InstanceError> {
    let tok = tokens.next().ok_or_else(|| malformed(format!("missing header field '{field}'")))?;
    tok.parse().map_err(|_| malformed(format!("non-numeric header field '{field}': '{tok}'")))
}

fn find_marker(lines: &[&str], marker: &str) -> Result<usize, InstanceError> {
    lines
        .iter()
        .position(|l| l.trim_start().starts_with(marker))
        .ok_or_else(|| malformed(format!("missing marker '{marker}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        "2 1 10 2 0.0\n\
# demands\n\
3 5\n\
# request locations\n\
0.0 0.0\n\
1.0 0.0\n\
0.0 1.0\n\
2.0 0.0\n\
0.0 2.0\n"
            .to_string()
    }

    #[test]
    fn parses_header_demands_and_coordinates() {
        let instance = parse_instance(&fixture(), Fairness::Jain).unwrap();
        assert_eq!(instance.n, 2);
        assert_eq!(instance.n_vehicles, 1);
        assert_eq!(instance.capacity, 10);
        assert_eq!(instance.gamma, 2);
        assert_eq!(instance.demands, vec![3, 5]);
        assert_eq!(instance.coords[0], (0.0, 0.0));
        assert_eq!(instance.coords[1], (1.0, 0.0));
    }

    #[test]
    fn missing_locations_marker_is_malformed() {
        let text = "2 1 10 2 0.0\n# demands\n3 5\n";
        let result = parse_instance(text, Fairness::Jain);
        assert!(matches!(result, Err(InstanceError::Malformed(_))));
    }

    #[test]
    fn demand_exceeding_capacity_is_invariant_violation() {
        let text = "1 1 5 1 0.0\n# demands\n6\n# request locations\n0.0 0.0\n1.0 0.0\n2.0 0.0\n";
        let result = parse_instance(text, Fairness::Jain);
        assert!(matches!(result, Err(InstanceError::InvariantViolation(_))));
    }
}
