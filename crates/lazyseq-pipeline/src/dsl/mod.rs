pub mod yaml;

pub use yaml::{load_pipeline, parse_yaml_pipeline, CompiledStep, ParsedPipeline, PipelineConfig, Step};
