use formula_engine::{evaluate, list_constants, list_functions, validate, Bindings, Variable};

fn main() {
    pretty_env_logger::init();

    println!("Functions:");
    for function in list_functions() {
        println!("  [{}] {:<48} {}", function.category, function.signature, function.description);
    }

    println!("Constants:");
    for constant in list_constants() {
        println!("  {:<18} {:<20} {}", constant.name, constant.value, constant.description);
    }

    let bindings: Bindings = [
        ("roof.span".to_string(), Variable::Number(7200.0)),
        ("roof.length".to_string(), Variable::Number(12000.0)),
        ("grade".to_string(), Variable::Text("MGP10".to_string())),
    ]
    .into_iter()
    .collect();

    let lines = [
        "TRUSS_COUNT({roof.length}, STANDARD_SPACING)",
        "ROUND(LINEAR_METERS(21, {roof.span} / 1000) * TIMBER_WASTAGE, 1)",
        "IFERROR({roof.span} / 0, 0)",
        "{grade} * 2",
        "ROUND({roof.pitch}, 1)",
        "(1 + 2",
    ];

    for line in lines {
        match validate(line, &bindings) {
            Ok(()) => match evaluate(line, &bindings) {
                Ok(value) => println!("{:<66} = {}", line, value),
                Err(err) => println!("{:<66} ! {}", line, err),
            },
            Err(err) => println!("{:<66} invalid: {}", line, err),
        }
    }
}
