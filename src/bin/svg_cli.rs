#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("svg_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use svg_engine::geom::Shape;
    use svg_engine::import::{ImportOptions, import_svg_file};

    const USAGE: &str = r#"svg_cli (svg-engine)

USAGE:
  svg_cli summary <file.svg> [options]

OPTIONS (summary):
  --label-by <attr>    Copy this attribute into the shape label (default: id)
  --no-label           Do not label shapes
  --no-mirror          Keep SVG Y-down coordinates
  --tolerance <f64>    Gap filling and loop closure tolerance (default: 1e-6)
  -h, --help           Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "summary" => cmd_summary(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_summary(args: &mut Args) -> Result<(), String> {
        let mut file: Option<PathBuf> = None;
        let mut options = ImportOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--label-by" => options.label_by = Some(args.value("--label-by")?),
                "--no-label" => options.label_by = None,
                "--no-mirror" => options.mirror = false,
                "--tolerance" => {
                    let raw = args.value("--tolerance")?;
                    let tolerance: f64 = raw
                        .parse()
                        .map_err(|err| format!("invalid --tolerance `{raw}`: {err}"))?;
                    options.tolerance = tolerance;
                    if !options.has_valid_tolerance() {
                        return Err(format!("--tolerance must be positive, got {raw}"));
                    }
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown option `{other}`\n\n{USAGE}"));
                }
                other => {
                    if file.is_some() {
                        return Err(format!("unexpected argument `{other}`"));
                    }
                    file = Some(PathBuf::from(other));
                }
            }
        }

        let file = file.ok_or("missing input file")?;
        let mut shapes = import_svg_file(&file, options).map_err(|err| err.to_string())?;

        let mut faces = 0usize;
        let mut wires = 0usize;
        for (index, shape) in shapes.by_ref().enumerate() {
            let shape = shape.map_err(|err| format!("{}: {err}", file.display()))?;
            println!("{}", describe(index, &shape));
            if shape.is_face() {
                faces += 1;
            } else {
                wires += 1;
            }
        }

        println!("faces:{faces} wires:{wires} {}", shapes.diagnostics().summary());
        for warning in &shapes.diagnostics().warnings {
            println!("warning: {warning}");
        }
        Ok(())
    }

    fn describe(index: usize, shape: &Shape) -> String {
        let label = shape.label().unwrap_or("-");
        let color = shape.color().map_or_else(
            || "-".to_owned(),
            |c| format!("rgba({:.3},{:.3},{:.3},{:.3})", c.r, c.g, c.b, c.a),
        );
        match shape {
            Shape::Face(face) => format!(
                "{index:>4} face  label={label} color={color} holes={} area={:.6}",
                face.inner_wires().len(),
                face.area()
            ),
            Shape::Wire(wire) => format!(
                "{index:>4} wire  label={label} color={color} edges={} closed={} length={:.6}",
                wire.edge_count(),
                wire.is_closed(),
                wire.length()
            ),
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
