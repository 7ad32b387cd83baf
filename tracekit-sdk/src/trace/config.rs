//! Pipeline configuration shared by every tracer a provider creates.

use crate::resource::Resource;
use crate::trace::{IdGenerator, RandomIdGenerator};

/// Tracer configuration
#[derive(Debug)]
#[non_exhaustive]
pub struct Config {
    /// The id generator the pipeline should use
    pub id_generator: Box<dyn IdGenerator>,

    /// Attributes representing the entity that produces telemetry
    pub resource: Resource,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            id_generator: Box::<RandomIdGenerator>::default(),
            resource: Resource::default(),
        }
    }
}
