// tests/property_paths.rs

use std::path::PathBuf;

use proptest::prelude::*;

use build_tool::pipeline::{destination, glob_base, with_suffix};

proptest! {
    #[test]
    fn suffix_goes_before_the_extension(
        dirs in proptest::collection::vec("[a-z]{1,6}", 0..4),
        stem in "[a-z][a-z0-9_-]{0,8}",
        ext in "[a-z]{1,4}",
    ) {
        let mut source: PathBuf = dirs.iter().collect();
        source.push(format!("{stem}.{ext}"));

        let output = with_suffix(&source, ".min");

        prop_assert_eq!(
            output.file_name().unwrap().to_str().unwrap(),
            format!("{stem}.min.{ext}")
        );
        prop_assert_eq!(destination(&output), destination(&source));
    }

    #[test]
    fn glob_base_is_always_literal(
        dirs in proptest::collection::vec("[a-z]{1,6}", 0..4),
        tail in prop_oneof![Just("**/*.scss"), Just("*.js"), Just("{a,b}/*.js"), Just("x?.js")],
    ) {
        let pattern = if dirs.is_empty() {
            tail.to_string()
        } else {
            format!("{}/{tail}", dirs.join("/"))
        };

        let base = glob_base(&pattern);

        prop_assert_eq!(base, dirs.iter().collect::<PathBuf>());
    }
}

#[test]
fn glob_base_examples() {
    assert_eq!(glob_base("assets/css/**/*.scss"), PathBuf::from("assets/css"));
    assert_eq!(glob_base("**/*.js"), PathBuf::new());
    assert_eq!(glob_base("./web/app.js"), PathBuf::from("web"));
}

#[test]
fn with_suffix_without_extension_appends() {
    assert_eq!(with_suffix(&PathBuf::from("bin/tool"), ".min"), PathBuf::from("bin/tool.min"));
}
