//! Document model, builders and the project envelope around it.

/// Fluent builders for compositions, pages and elements.
pub mod dsl;
/// Composition, page, element and audio types plus validation.
pub mod model;
/// Load-time id repair.
pub mod normalize;
/// Persisted project: composition, editor state and local files.
pub mod project;
