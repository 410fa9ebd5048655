use std::collections::BTreeMap;
use std::sync::Arc;

use dough_table::ReferenceTable;

use crate::calculator::{DoughCalculator, NeapolitanCalculator};
use crate::error::{RecipeError, RecipeResult};

/// Calculators keyed by the pizza style they serve.
#[derive(Clone, Debug, Default)]
pub struct CalculatorRegistry {
    calculators: BTreeMap<String, Arc<dyn DoughCalculator>>,
}

impl CalculatorRegistry {
    /// Registry serving every built-in style from `table`.
    pub fn with_builtin(table: Arc<ReferenceTable>) -> Self {
        let mut registry = CalculatorRegistry::default();
        registry.register(Arc::new(NeapolitanCalculator::new(table)));
        registry
    }

    /// Add `calculator`, replacing any calculator already serving its style.
    pub fn register(&mut self, calculator: Arc<dyn DoughCalculator>) {
        self.calculators
            .insert(calculator.style().to_string(), calculator);
    }

    pub fn get(&self, style: &str) -> RecipeResult<Arc<dyn DoughCalculator>> {
        self.calculators
            .get(style)
            .cloned()
            .ok_or_else(|| RecipeError::NoCalculatorFound(style.to_string()))
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.calculators.keys().map(String::as_str)
    }
}
