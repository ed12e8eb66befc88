//! # Constants and type definitions for groundtruth
//!
//! This module centralizes the **default configuration values**, **unit conversions**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Defaults for the configuration surface (start offset, association threshold, time offset,
//!   scale factors)
//! - Unit conversions (nanoseconds ↔ seconds)
//! - File layout constants for the supported dataset formats (sidecar names, comment lines)
//! - Core type aliases used across the crate
use std::collections::HashMap;

use ahash::RandomState;
use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Nanoseconds in one second
pub const NANOS_PER_SECOND: f64 = 1e9;

// -------------------------------------------------------------------------------------------------
// Configuration defaults
// -------------------------------------------------------------------------------------------------

/// Default maximum time difference (seconds) between two associated timestamps.
///
/// Expressed in the native nanosecond unit this is `0.025 × 10⁹`.
pub const DEFAULT_MAX_TIME_DIFFERENCE: Seconds = 0.025;

/// Default offset (seconds) added to secondary timestamps before association
pub const DEFAULT_TIME_OFFSET: Seconds = 0.0;

/// Default start frame offset
pub const DEFAULT_START_FRAME_OFFSET: usize = 0;

/// Scale factor applied to Simple ground truth positions
pub const SCALE_SIMPLE: f64 = 1.0;

/// Scale factor applied to KITTI ground truth positions
pub const SCALE_KITTI: f64 = 1.0;

/// Scale factor applied to TUM ground truth positions
pub const SCALE_TUM: f64 = 1.0;

/// Scale factor applied to EuRoC ground truth positions
pub const SCALE_EUROC: f64 = 1.0;

// -------------------------------------------------------------------------------------------------
// Dataset layout
// -------------------------------------------------------------------------------------------------

/// Comment lines at the top of a TUM `groundtruth.txt`
pub const TUM_COMMENT_LINES: usize = 3;

/// Sidecar holding the TUM frame → ground truth associations
pub const TUM_SIDECAR: &str = "gt_associations.json";

/// Sidecar holding the EuRoC frame → ground truth associations
pub const EUROC_SIDECAR: &str = "associations.json";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Time in seconds
pub type Seconds = f64;

/// Frame index requested by a downstream consumer (before the start offset is applied)
pub type FrameId = usize;

/// 3-D position of a ground truth sample
pub type Position = Vector3<f64>;

/// Hash map using [`ahash`](https://docs.rs/ahash) for fast hashing.
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;
