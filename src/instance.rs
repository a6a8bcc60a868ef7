use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A validated cutting stock instance: boards of width `stock_width` have to be cut into
/// pieces of the given `widths`, `demands[i]` pieces of width `widths[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstance", into = "RawInstance")]
pub struct Instance {
    stock_width: f64,
    widths: Vec<f64>,
    demands: Vec<u64>,
}

/// Unvalidated form of an [`Instance`], as found in instance files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInstance {
    stock_width: f64,
    widths: Vec<f64>,
    demands: Vec<u64>,
}

impl Instance {
    /// Validates the input and builds an instance.
    pub fn new(
        stock_width: f64,
        widths: Vec<f64>,
        demands: Vec<u64>,
    ) -> Result<Self, InputError> {
        if !(stock_width.is_finite() && stock_width > 0.0) {
            return Err(InputError::NonPositiveStockWidth(stock_width));
        }
        if widths.is_empty() {
            return Err(InputError::Empty);
        }
        if widths.len() != demands.len() {
            return Err(InputError::LengthMismatch {
                widths: widths.len(),
                demands: demands.len(),
            });
        }
        for (index, &width) in widths.iter().enumerate() {
            if !(width.is_finite() && width > 0.0) {
                return Err(InputError::NonPositiveWidth { index, width });
            }
            if width > stock_width {
                return Err(InputError::WidthExceedsStock {
                    index,
                    width,
                    stock_width,
                });
            }
            if stock_width / width > u32::MAX as f64 {
                return Err(InputError::TooManyPieces {
                    index,
                    width,
                    stock_width,
                });
            }
            if let Some(first) = widths[..index].iter().position(|&w| w == width) {
                return Err(InputError::DuplicateWidth {
                    first,
                    second: index,
                    width,
                });
            }
        }
        Ok(Instance {
            stock_width,
            widths,
            demands,
        })
    }

    pub fn stock_width(&self) -> f64 {
        self.stock_width
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn demands(&self) -> &[u64] {
        &self.demands
    }

    /// Number of distinct piece widths.
    pub fn n_items(&self) -> usize {
        self.widths.len()
    }

    /// Total width of all demanded pieces.
    pub fn total_demanded_width(&self) -> f64 {
        self.widths
            .iter()
            .zip(&self.demands)
            .map(|(w, &d)| w * d as f64)
            .sum()
    }

    /// Boards needed if no width were ever wasted, a lower bound on every solution.
    pub fn material_bound(&self) -> u64 {
        (self.total_demanded_width() / self.stock_width).ceil() as u64
    }
}

impl TryFrom<RawInstance> for Instance {
    type Error = InputError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Instance::new(raw.stock_width, raw.widths, raw.demands)
    }
}

impl From<Instance> for RawInstance {
    fn from(instance: Instance) -> Self {
        RawInstance {
            stock_width: instance.stock_width,
            widths: instance.widths,
            demands: instance.demands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_instance() {
        let instance = Instance::new(15.0, vec![4.0, 6.0, 7.0], vec![80, 50, 100]).unwrap();
        assert_eq!(instance.n_items(), 3);
        assert_eq!(instance.stock_width(), 15.0);
        assert_eq!(instance.demands(), &[80, 50, 100]);
        assert_eq!(instance.total_demanded_width(), 1320.0);
        assert_eq!(instance.material_bound(), 88);
    }

    #[test]
    fn width_equal_to_stock_is_allowed() {
        assert!(Instance::new(10.0, vec![10.0], vec![3]).is_ok());
    }

    #[test]
    fn rejects_non_positive_stock() {
        assert_eq!(
            Instance::new(0.0, vec![1.0], vec![1]),
            Err(InputError::NonPositiveStockWidth(0.0))
        );
        assert!(matches!(
            Instance::new(f64::NAN, vec![1.0], vec![1]),
            Err(InputError::NonPositiveStockWidth(_))
        ));
    }

    #[test]
    fn rejects_bad_widths() {
        assert_eq!(
            Instance::new(10.0, vec![3.0, -1.0], vec![1, 1]),
            Err(InputError::NonPositiveWidth {
                index: 1,
                width: -1.0
            })
        );
        assert_eq!(
            Instance::new(10.0, vec![3.0, 11.0], vec![1, 1]),
            Err(InputError::WidthExceedsStock {
                index: 1,
                width: 11.0,
                stock_width: 10.0
            })
        );
        assert_eq!(
            Instance::new(10.0, vec![3.0, 4.0, 3.0], vec![1, 1, 1]),
            Err(InputError::DuplicateWidth {
                first: 0,
                second: 2,
                width: 3.0
            })
        );
    }

    #[test]
    fn piece_counts_must_fit_u32() {
        assert_eq!(
            Instance::new(1e12, vec![5.0, 1.0], vec![1, 1]),
            Err(InputError::TooManyPieces {
                index: 1,
                width: 1.0,
                stock_width: 1e12
            })
        );
        assert!(Instance::new(u32::MAX as f64, vec![1.0], vec![1]).is_ok());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            Instance::new(10.0, vec![3.0, 4.0], vec![1]),
            Err(InputError::LengthMismatch {
                widths: 2,
                demands: 1
            })
        );
        assert_eq!(Instance::new(10.0, vec![], vec![]), Err(InputError::Empty));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"stock_width": 15, "widths": [4, 6, 7], "demands": [80, 50, 100]}"#;
        let ok: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(ok.widths(), &[4.0, 6.0, 7.0]);

        let json = r#"{"stock_width": 5, "widths": [6], "demands": [1]}"#;
        let too_wide = serde_json::from_str::<Instance>(json);
        assert!(too_wide.unwrap_err().to_string().contains("exceeds the stock width"));

        let json = r#"{"stock_width": 5, "widths": [2], "demands": [-1]}"#;
        assert!(serde_json::from_str::<Instance>(json).is_err());
    }

    #[test]
    fn serializes_as_plain_fields() {
        let instance = Instance::new(15.0, vec![4.0], vec![2]).unwrap();
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["stock_width"], 15.0);
        assert_eq!(json["demands"][0], 2);
    }
}
