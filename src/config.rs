//! Generation options and the serde-loadable config behind them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::collaborators::{
    DefaultExpressionGenerator, DefaultFunctionGenerator, DefaultSlotGenerator,
    ExpressionGenerator, FunctionGenerator, NodeGenerator, SlotGenerator,
};
use crate::error::{GenerateError, Result};
use crate::function_shape::{HeuristicShapeDetector, ShapeDetector};
use crate::hooks::HandlerSet;
use crate::keywords::{KeywordExtractor, OxcKeywordExtractor};

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do with a `JSSlot` when no node generator is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPolicy {
    /// Emit an empty string for the slot.
    #[default]
    Degrade,
    /// Fail with [`GenerateError::MissingNodeGenerator`].
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateConfig {
    /// Maximum nesting depth before generation fails with `DepthExceeded`.
    pub max_depth: usize,
    pub slot_policy: SlotPolicy,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            slot_policy: SlotPolicy::Degrade,
        }
    }
}

impl GenerateConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: GenerateConfig =
            serde_json::from_str(raw).map_err(|e| GenerateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let config: GenerateConfig =
            serde_json::from_value(raw).map_err(|e| GenerateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(GenerateError::Config("maxDepth must be at least 1".to_string()));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATE OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything a `generate` call needs besides the value and the scope.
#[derive(Clone)]
pub struct GenerateOptions {
    pub handlers: HandlerSet,
    pub node_generator: Option<Arc<dyn NodeGenerator>>,
    pub config: GenerateConfig,
    pub expressions: Arc<dyn ExpressionGenerator>,
    pub functions: Arc<dyn FunctionGenerator>,
    pub slots: Arc<dyn SlotGenerator>,
    pub keywords: Arc<dyn KeywordExtractor>,
    pub shapes: Arc<dyn ShapeDetector>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            handlers: HandlerSet::new(),
            node_generator: None,
            config: GenerateConfig::default(),
            expressions: Arc::new(DefaultExpressionGenerator::default()),
            functions: Arc::new(DefaultFunctionGenerator),
            slots: Arc::new(DefaultSlotGenerator),
            keywords: Arc::new(OxcKeywordExtractor),
            shapes: Arc::new(HeuristicShapeDetector),
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GenerateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_handlers(mut self, handlers: HandlerSet) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_node_generator(mut self, generator: impl NodeGenerator + 'static) -> Self {
        self.node_generator = Some(Arc::new(generator));
        self
    }

    pub fn with_expression_generator(
        mut self,
        generator: impl ExpressionGenerator + 'static,
    ) -> Self {
        self.expressions = Arc::new(generator);
        self
    }

    pub fn with_function_generator(mut self, generator: impl FunctionGenerator + 'static) -> Self {
        self.functions = Arc::new(generator);
        self
    }

    pub fn with_slot_generator(mut self, generator: impl SlotGenerator + 'static) -> Self {
        self.slots = Arc::new(generator);
        self
    }

    pub fn with_keyword_extractor(mut self, extractor: impl KeywordExtractor + 'static) -> Self {
        self.keywords = Arc::new(extractor);
        self
    }

    pub fn with_shape_detector(mut self, detector: impl ShapeDetector + 'static) -> Self {
        self.shapes = Arc::new(detector);
        self
    }
}

impl fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("handlers", &self.handlers)
            .field("node_generator", &self.node_generator.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
