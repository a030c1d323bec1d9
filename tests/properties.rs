// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Property-based tests for the parser invariants: scope nesting is
//! balanced, timestamps are checked for monotonicity, and written documents
//! parse back to themselves.

use proptest::prelude::*;
use vcd_parser::{parse_vcd, write_vcd, Driver, ParseOptions, SemanticKind};

/// `true` opens a scope, `false` closes one
fn scope_ops_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..40)
}

fn header_from_ops(ops: &[bool]) -> String {
    let mut src = String::new();
    for (idx, open) in ops.iter().enumerate() {
        if *open {
            src.push_str(&format!("$scope module s{idx} $end\n$var wire 1 ! v{idx} $end\n"));
        } else {
            src.push_str("$upscope $end\n");
        }
    }
    src.push_str("$var wire 1 ! last $end\n$enddefinitions $end\n#0\n1!\n");
    src
}

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[01xz]".prop_map(|bit| format!("{bit}!")),
        "[01xz]{1,8}".prop_map(|bits| format!("b{bits} \"")),
        (-1.0e6f64..1.0e6).prop_map(|real| format!("r{real} #")),
    ]
}

proptest! {
    #[test]
    fn scope_stack_balance(ops in scope_ops_strategy()) {
        let mut depth = 0usize;
        let mut extra_upscopes = 0;
        for open in &ops {
            if *open {
                depth += 1;
            } else if depth == 0 {
                extra_upscopes += 1;
            } else {
                depth -= 1;
            }
        }
        let src = header_from_ops(&ops);

        let lenient = Driver::new(ParseOptions::lenient()).parse(src.as_bytes()).unwrap();
        let pushes = ops.iter().filter(|open| **open).count();
        // every `$scope` plus the unnamed root
        prop_assert_eq!(lenient.header().scopes().len(), pushes + 1);
        prop_assert!(lenient.header().scopes()[1..].iter().all(|scope| !scope.is_root()));
        let unclosed = usize::from(depth > 0);
        prop_assert_eq!(lenient.diagnostics().len(), extra_upscopes + unclosed);

        match parse_vcd(src.as_bytes()) {
            Ok(document) => {
                prop_assert_eq!(depth, 0);
                prop_assert!(document
                    .diagnostics()
                    .iter()
                    .all(|d| d.semantic_kind() == Some(SemanticKind::UnbalancedUpscope)));
            }
            Err(diagnostics) => {
                prop_assert!(depth > 0);
                prop_assert_eq!(
                    diagnostics.fatal().unwrap().semantic_kind(),
                    Some(SemanticKind::UnclosedScope)
                );
            }
        }
    }

    #[test]
    fn decreasing_timestamps_are_reported(times in prop::collection::vec(0u64..1000, 1..30)) {
        let mut src = String::from("$var wire 1 ! clk $end\n$enddefinitions $end\n");
        for time in &times {
            src.push_str(&format!("#{time}\n1!\n"));
        }

        let document = parse_vcd(src.as_bytes()).unwrap();
        let recorded: Vec<u64> = document.value_changes().iter().map(|c| c.timestamp).collect();
        prop_assert_eq!(&recorded, &times);

        let decreases = times.windows(2).filter(|w| w[1] < w[0]).count();
        prop_assert_eq!(document.diagnostics().len(), decreases);
        prop_assert!(document
            .diagnostics()
            .iter()
            .all(|d| d.semantic_kind() == Some(SemanticKind::NonMonotonicTime)));
    }

    #[test]
    fn written_documents_parse_back(
        blocks in prop::collection::vec((1u64..100, prop::collection::vec(value_strategy(), 0..5)), 0..20)
    ) {
        let mut src = String::from(
            "$timescale 1 us $end\n\
             $scope module top $end\n\
             $var wire 1 ! bit $end\n\
             $var wire 8 \" bus [7:0] $end\n\
             $var real 64 # level $end\n\
             $upscope $end\n\
             $enddefinitions $end\n",
        );
        let mut time = 0;
        for (step, values) in &blocks {
            time += step;
            src.push_str(&format!("#{time}\n"));
            for value in values {
                src.push_str(value);
                src.push('\n');
            }
        }

        let document = parse_vcd(src.as_bytes()).unwrap();
        prop_assert!(document.is_clean());

        let mut out = vec![];
        write_vcd(&document, &mut out).unwrap();
        let reparsed = parse_vcd(out.as_slice()).unwrap();
        prop_assert_eq!(reparsed, document);
    }
}
