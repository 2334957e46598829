//! Tests using local testdata/ quest files. Skipped if testdata is absent.

use std::path::Path;

use qst_decode::container::PackfileDecoder;
use qst_decode::decode::{DecodeOptions, decode_file};
use qst_decode::quest::summarize;

fn testdata(name: &str) -> Option<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    path.exists().then(|| path.to_str().unwrap().to_string())
}

macro_rules! skip_if_missing {
    ($path:expr) => {
        match testdata($path) {
            Some(p) => p,
            None => {
                eprintln!("SKIP: testdata/{} not found", $path);
                return;
            }
        }
    };
}


#[test]
fn classic_quest_decodes() {
    let path = skip_if_missing!("1st.qst");
    let payload = decode_file(&path, &DecodeOptions::default(), &PackfileDecoder).unwrap();
    let summary = summarize(&payload).unwrap();
    assert!(summary.is_known_id(), "id line: {}", summary.id_line);
    assert!(summary.header.is_some());
    assert_eq!(summary.sections[0].id, "HDR ");
}

#[test]
fn non_quest_files_rejected() {
    for name in ["not-a-quest.bin", "truncated.qst"] {
        if let Some(path) = testdata(name) {
            assert!(
                decode_file(&path, &DecodeOptions::default(), &PackfileDecoder).is_err(),
                "should reject {name}"
            );
        }
    }
}
