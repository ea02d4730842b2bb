pub mod conditional;
pub mod math;
pub mod timber;

mod resolver;

pub use resolver::{resolve_functions, Resolver, DEFAULT_MAX_PASSES, MAX_GUARDED_DEPTH};

use crate::error::FormulaResult;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// A built-in whose arguments are evaluated before the call.
pub type Function = fn(&[f64]) -> FormulaResult<f64>;

/// A built-in that receives its raw argument text and decides what to
/// evaluate, through the callback, and how to treat failures.
pub type GuardedFunction =
    fn(&[&str], &mut dyn FnMut(&str) -> FormulaResult<f64>) -> FormulaResult<f64>;

#[derive(Clone, Copy)]
pub enum FunctionKind {
    Eager(Function),
    Guarded(GuardedFunction),
}

/// Accepted argument counts; `max: None` means variadic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Math,
    Timber,
    Conditional,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Math => "Math Functions",
            Category::Timber => "Timber Calculations",
            Category::Conditional => "Conditional Functions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct FunctionDef {
    /// Uppercase call name.
    pub name: &'static str,
    /// Picker text, e.g. `ROUND(value, decimals)`.
    pub signature: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub arity: Arity,
    pub kind: FunctionKind,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("category", &self.category)
            .field("arity", &self.arity)
            .finish()
    }
}

/// The closed set of built-ins, in picker order.
pub struct FunctionRegistry {
    functions: Vec<FunctionDef>,
    index: HashMap<&'static str, usize>,
}

impl FunctionRegistry {
    fn new() -> Self {
        let mut registry = Self {
            functions: Vec::new(),
            index: HashMap::new(),
        };

        math::register(&mut registry);
        timber::register(&mut registry);
        conditional::register(&mut registry);

        registry
    }

    pub(crate) fn register(&mut self, def: FunctionDef) {
        self.index.insert(def.name, self.functions.len());
        self.functions.push(def);
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.index.get(name).map(|&i| &self.functions[i])
    }
}

pub static FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

pub fn list_functions() -> &'static [FunctionDef] {
    &FUNCTIONS.functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_function_table_order_and_categories() {
        let names: Vec<_> = list_functions().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "ROUND",
                "CEIL",
                "FLOOR",
                "ABS",
                "MAX",
                "MIN",
                "SQRT",
                "POW",
                "TRUSS_COUNT",
                "LINEAR_METERS",
                "BOARD_FEET",
                "CUBIC_METERS",
                "IF",
                "IFERROR",
            ]
        );
        assert_eq!(FUNCTIONS.get("TRUSS_COUNT").unwrap().category, Category::Timber);
        assert_eq!(FUNCTIONS.get("IFERROR").unwrap().category.label(), "Conditional Functions");
        assert!(FUNCTIONS.get("round").is_none());
    }

    #[test]
    fn test_arities() {
        assert_eq!(FUNCTIONS.get("ROUND").unwrap().arity, Arity { min: 1, max: Some(2) });
        assert_eq!(FUNCTIONS.get("MAX").unwrap().arity, Arity { min: 1, max: None });
        assert_eq!(FUNCTIONS.get("BOARD_FEET").unwrap().arity, Arity { min: 4, max: Some(4) });
        assert_eq!(FUNCTIONS.get("IF").unwrap().arity, Arity { min: 3, max: Some(3) });
        assert_eq!(FUNCTIONS.get("IFERROR").unwrap().arity, Arity { min: 2, max: Some(2) });
        assert!(Arity { min: 1, max: None }.accepts(40));
        assert!(!Arity { min: 1, max: Some(2) }.accepts(3));
    }

    #[test]
    fn test_signatures_start_with_name() {
        for def in list_functions() {
            assert!(def.signature.starts_with(&format!("{}(", def.name)));
            assert!(!def.description.is_empty());
        }
    }

    fn random_argument(rng: &mut StdRng) -> String {
        match rng.random_range(0..4) {
            0 => "0".to_string(),
            1 => format!("{}", rng.random_range(-1000.0..1000.0)),
            2 => format!("({})", rng.random_range(-50i32..50)),
            _ => format!("{}/{}", rng.random_range(0..100), rng.random_range(0..3)),
        }
    }

    /// Random well-formed calls, at and around each declared arity, must
    /// either produce a finite number or a typed error.
    #[test]
    fn test_fuzz_every_function() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for def in list_functions() {
            for _ in 0..200 {
                let upper = def.arity.max.unwrap_or(def.arity.min + 4) + 1;
                let count = rng.random_range(0..=upper);
                let args: Vec<String> = (0..count).map(|_| random_argument(&mut rng)).collect();
                let call = format!("{}({})", def.name, args.join(", "));

                match Resolver::new(DEFAULT_MAX_PASSES).evaluate(&call) {
                    Ok(value) => {
                        assert!(value.is_finite(), "{} gave {}", call, value);
                        assert!(def.arity.accepts(count), "{} accepted {} args", call, count);
                    }
                    Err(FormulaError::UnknownFunction(name)) => {
                        panic!("{} is listed but unknown", name)
                    }
                    Err(_) => {}
                }
            }
        }
    }
}
