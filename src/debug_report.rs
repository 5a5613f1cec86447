use phrasebook::{MatchResultVerbose, Matcher, SelectionPath};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(res: &MatchResultVerbose, matcher: &Matcher, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Matching: \"{}\"", res.input.trim()), ansi::CYAN)));
    println!(
        "  {}",
        palette.dim(format!(
            "{} rules │ {} phrases │ {} buckets │ {} placeholders",
            matcher.rule_count(),
            matcher.entry_count(),
            matcher.bucket_count(),
            matcher.registry().len()
        ))
    );

    println!("\n{}", palette.paint("━━━ Selection ━━━", ansi::GRAY));
    print_selection(res, &palette);

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if res.responses.is_empty() {
        println!("{}", palette.dim("  No responses"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No input token is the anchor of any phrase");
        println!("  • Phrase tokens appear out of order in the input");
        println!("  • The rule directory is empty or its documents failed to parse");
        println!("\n{}", palette.dim("  Tip: run with -v (or RUST_LOG=debug) to see skipped documents"));
    } else {
        print_results(res, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let metrics = &res.details.metrics;
    println!(
        "  Total: {}  │  Scan: {}  │  Select: {}  │  Evaluate: {}",
        palette.paint(format!("{:?}", metrics.total), ansi::GREEN),
        palette.dim(format!("{:?}", metrics.scan)),
        palette.dim(format!("{:?}", metrics.select)),
        palette.paint(format!("{:?}", metrics.evaluate), ansi::CYAN),
    );
    println!();
}

fn print_selection(res: &MatchResultVerbose, palette: &ansi::Palette) {
    let details = &res.details;
    println!("  {} {}", palette.paint("Tokens:", ansi::BLUE), palette.dim(details.tokens.join(" ")));

    if details.buckets.is_empty() {
        println!("  {} {}", palette.paint("Buckets:", ansi::BLUE), palette.dim("✗ none"));
    } else {
        let hits: Vec<String> =
            details.buckets.iter().map(|b| format!("{}({})", palette.paint(&b.token, ansi::YELLOW), b.size)).collect();
        println!("  {} {}", palette.paint("Buckets:", ansi::BLUE), hits.join(" "));
    }

    let path = match details.path {
        SelectionPath::NoBuckets => palette.dim("fallback only"),
        SelectionPath::Intersection => palette.paint("intersection", ansi::GREEN),
        SelectionPath::Union => palette.paint("union", ansi::CYAN),
    };
    println!(
        "  {} {}  {} {} {}",
        palette.paint("Path:", ansi::BLUE),
        path,
        palette.dim("│ candidates:"),
        palette.paint(details.candidates.to_string(), ansi::YELLOW),
        palette.dim(format!("({} fallback)", details.fallback)),
    );
}

fn print_results(res: &MatchResultVerbose, palette: &ansi::Palette) {
    for (idx, response) in res.responses.iter().enumerate() {
        println!(
            "  {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(response, ansi::GREEN))
        );
        if let Some(phrase) = res.details.matched_phrases.get(idx) {
            println!("      {} {}", palette.dim("phrase:"), palette.paint(phrase, ansi::CYAN));
        }
    }
}
