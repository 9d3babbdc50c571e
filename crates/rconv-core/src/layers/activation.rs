//! シグモイド活性化

use crate::grid::Grid;

/// `1 / (1 + e^(-x))`
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// 要素ごとのシグモイド（インプレース、確保なし）
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn apply<G: Grid>(grid: &mut G) {
        grid.map_in_place(sigmoid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DynamicGrid;

    #[test]
    fn test_sigmoid_at_zero() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn test_sigmoid_monotonic_and_bounded() {
        // |x| が大きすぎると f64 で 0.0 / 1.0 に丸まるため、表現可能な範囲で確認
        let xs: Vec<f64> = (-60..=60).map(|i| i as f64 * 0.5).collect();
        for pair in xs.windows(2) {
            let (a, b) = (sigmoid(pair[0]), sigmoid(pair[1]));
            assert!(a < b, "sigmoid not increasing between {} and {}", pair[0], pair[1]);
        }
        for &x in &xs {
            let y = sigmoid(x);
            assert!(y > 0.0 && y < 1.0, "sigmoid({x}) = {y}");
        }
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for x in [0.25, 1.0, 3.0, 7.5] {
            assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_apply_in_place() {
        let mut g = DynamicGrid::from_values(2, &[0.0, 0.0, 2.0, -2.0]).unwrap();
        Sigmoid::apply(&mut g);
        assert_eq!(g.get(0, 0), 0.5);
        assert_eq!(g.get(0, 1), 0.5);
        assert!((g.get(1, 0) - 0.880_797_077_977_882_3).abs() < 1e-15);
        assert!((g.get(1, 1) - 0.119_202_922_022_117_7).abs() < 1e-15);
    }
}
