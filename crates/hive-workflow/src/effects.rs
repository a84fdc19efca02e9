//! Effect bundle required by workflow operations.

use hive_core::effects::{PhysicalTimeEffects, RandomEffects};

/// Clock plus randomness. Every handler that provides both qualifies.
pub trait WorkflowEffects: PhysicalTimeEffects + RandomEffects {}

impl<T: PhysicalTimeEffects + RandomEffects + ?Sized> WorkflowEffects for T {}
