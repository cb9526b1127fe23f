//! Wall geometry.
//!
//! The quote form describes a rectangular plot: the wall runs the full
//! perimeter at a uniform height.

use crate::units::{Feet, SqFt};

/// Perimeter of a rectangular plot, P = 2(L + B)
pub fn perimeter(length: Feet, breadth: Feet) -> Feet {
    (length + breadth) * 2.0
}

/// Wall face area, A = P × H
pub fn wall_area(perimeter: Feet, height: Feet) -> SqFt {
    perimeter * height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perimeter() {
        assert_eq!(perimeter(Feet(10.0), Feet(8.0)), Feet(36.0));
    }

    #[test]
    fn test_area_is_exact() {
        let p = perimeter(Feet(12.5), Feet(7.25));
        assert_eq!(wall_area(p, Feet(5.5)).0, 2.0 * (12.5 + 7.25) * 5.5);
    }
}
