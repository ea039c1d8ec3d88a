//! Chart Rendering
//!
//! Turns a [`ChartSpec`](crate::report::ChartSpec) into SVG:
//!
//! - **surface**: Owned SVG element tree per chart id, plus the registry
//! - **scale**: Band and linear scales with nice domains and ticks
//! - **shape**: Pie layout and arc paths
//! - **axis**: Axis and grid groups
//! - **chart**: The bar, line and pie renderer
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use reportview::render::{ChartRenderer, RenderSurface};
//! use reportview::report::ChartSpec;
//!
//! let spec = ChartSpec::from_chart_data(
//!     r#"{"chart":{"title":"Sales","type":"bar",
//!        "series":[{"name":"Q1","labels":["A","B"],"data":[5,10]}]}}"#,
//! ).unwrap();
//!
//! let mut surface = RenderSurface::new("sales");
//! ChartRenderer::new().render(&mut surface, &spec).unwrap();
//! assert!(surface.to_svg().starts_with("<svg"));
//! ```

pub mod axis;
pub mod chart;
pub mod error;
pub mod scale;
pub mod shape;
pub mod surface;

// Re-export commonly used types
pub use chart::{ChartRenderer, Margin, DEFAULT_BAR_COLOR, DEFAULT_LINE_COLOR, FALLBACK_PALETTE};
pub use error::RenderError;
pub use scale::{BandScale, LinearScale};
pub use shape::{pie_layout, Arc, PieSlice};
pub use surface::{Element, Node, RenderSurface, SurfaceRegistry, CANVAS_HEIGHT, CANVAS_WIDTH};
