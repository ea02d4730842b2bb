use once_cell::sync::Lazy;
use regex::Regex;

/// A reserved uppercase name that always stands for a fixed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub name: &'static str,
    pub value: f64,
    pub description: &'static str,
}

/// Timber calculation constants, in picker order.
pub const CONSTANTS: &[Constant] = &[
    Constant {
        name: "PI",
        value: std::f64::consts::PI,
        description: "Mathematical constant π",
    },
    Constant {
        name: "E",
        value: std::f64::consts::E,
        description: "Mathematical constant e",
    },
    Constant {
        name: "TIMBER_WASTAGE",
        value: 1.1,
        description: "Standard timber wastage factor (10%)",
    },
    Constant {
        name: "STANDARD_SPACING",
        value: 600.0,
        description: "Standard truss spacing (600mm)",
    },
    Constant {
        name: "SAFETY_FACTOR",
        value: 1.2,
        description: "Safety factor for calculations",
    },
];

/// Word-boundary pattern per constant, compiled once.
pub(crate) static CONSTANT_PATTERNS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    CONSTANTS
        .iter()
        .filter_map(|constant| {
            let pattern = format!(r"\b{}\b", regex::escape(constant.name));
            Regex::new(&pattern)
                .ok()
                .map(|regex| (regex, constant.value.to_string()))
        })
        .collect()
});

pub fn list_constants() -> &'static [Constant] {
    CONSTANTS
}
