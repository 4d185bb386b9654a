//! Domain entities for the QMP driver.
//!
//! This module contains pure logic with no I/O: the semantic [`action::Action`]
//! model and the [`geometry::ScreenGeometry`] used to normalize coordinates.
//! Both are plain data with no dependency on the transport, so they can be
//! tested in isolation and shared by any front end.

/// Semantic UI actions and their validation rules.
pub mod action;

/// Logical screen size and pixel-to-virtual-pointer normalization.
pub mod geometry;
