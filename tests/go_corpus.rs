use goscan::GoSource;
use walkdir::WalkDir;

/// Parses every `.go` file under `$GOSCAN_CORPUS` (a Go checkout, say) and
/// runs a query over each.
#[test]
fn parses_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GOSCAN_CORPUS") else {
        eprintln!("GOSCAN_CORPUS not set; skipping corpus test");
        return;
    };

    let mut total = 0usize;
    for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata holds deliberately broken files.
        if path.components().any(|c| c.as_os_str() == "testdata") {
            continue;
        }

        total += 1;
        match GoSource::open(path) {
            Ok(src) => {
                let _ = src.function_names("", &[]);
            }
            Err(goscan::Error::Parse(f)) => {
                for d in f.diags.iter().take(8) {
                    eprintln!("  {:?} {:?}: {}", d.kind, d.span, d.message);
                }
                panic!("{} failed to parse after {total} files", path.display());
            }
            Err(_) => continue,
        }
    }

    eprintln!("Parsed {total} Go files.");
}
