//! Render error types

use thiserror::Error;

/// Errors that stop a chart from being drawn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Spec carries no series to draw
    #[error("chart has no series")]
    NoSeries,

    /// A data value is NaN or infinite
    #[error("data value at index {index} is not a finite number")]
    NonFiniteValue { index: usize },

    /// Pie values add up past the largest finite number
    #[error("pie chart values overflow")]
    PieOverflow,
}
