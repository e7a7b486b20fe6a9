//! Common types and utilities shared across CLI commands.

use osmlayer::coord::GeoBounds;

/// Parse `south,west,north,east` into bounds.
pub fn parse_bbox(s: &str) -> Result<GeoBounds, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{}': {}", s, e))?;

    let &[south, west, north, east] = values.as_slice() else {
        return Err(format!(
            "expected south,west,north,east but got {} values",
            values.len()
        ));
    };

    let bounds = GeoBounds::new(south, west, north, east);
    if !bounds.is_finite() {
        return Err(format!("non-finite coordinate in '{}'", s));
    }
    if south > north || west > east {
        return Err(format!("south/west must not exceed north/east in '{}'", s));
    }
    Ok(bounds)
}
