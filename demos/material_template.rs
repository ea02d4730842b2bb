use formula_engine::{Bindings, FormulaEngine, Variable};

fn main() {
    pretty_env_logger::init();

    let engine = FormulaEngine::with_max_passes(64);

    let template = [
        ("Trusses", "TRUSS_COUNT({length}, STANDARD_SPACING)"),
        (
            "Top chord (m)",
            "ROUND(LINEAR_METERS(TRUSS_COUNT({length}, STANDARD_SPACING), {span} / 1000) * TIMBER_WASTAGE, 2)",
        ),
        ("Battens (m3)", "ROUND(CUBIC_METERS(40, 70, 35, {length}), 3)"),
        ("Board feet", "ROUND(BOARD_FEET(12, 6, 2, 96), 1)"),
        ("Fixings", "CEIL({span} / 300) * SAFETY_FACTOR"),
        ("Bracing", "{bracing} * 2"),
    ];

    let jobs = [
        [("span", 7200.0), ("length", 12000.0)],
        [("span", 9000.0), ("length", 18000.0)],
    ];

    let expressions: Vec<&str> = template.iter().map(|(_, expression)| *expression).collect();

    for (i, job) in jobs.iter().enumerate() {
        let bindings: Bindings = job
            .iter()
            .map(|(name, value)| (name.to_string(), Variable::Number(*value)))
            .collect();

        println!("Job {}:", i + 1);
        let results = engine.evaluate_all(&expressions, &bindings);
        for ((item, _), result) in template.iter().zip(results) {
            match result {
                Ok(quantity) => println!("  {:<16} {}", item, quantity),
                Err(err) => println!("  {:<16} error: {}", item, err),
            }
        }
    }
}
