//! Property tests for the serializer

use notion_formula_core::{Builder, DateValue, Expr, Node, ResultType, TreeKind};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (-1.0e12f64..1.0e12).prop_map(Expr::Number),
        any::<bool>().prop_map(Expr::Bool),
        "[a-zA-Z0-9 '\"\\\\]{0,12}".prop_map(Expr::Text),
        (0i64..4_102_444_800_000).prop_map(|ms| Expr::Date(DateValue::from_timestamp_millis(ms))),
    ]
}

fn expr() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            "[a-z]{1,8}".prop_map(|name| Node::constant(ResultType::Number, name).into()),
            ("[a-z]{1,8}", prop::collection::vec(inner, 0..4))
                .prop_map(|(name, children)| Node::function(ResultType::Text, name, children).into()),
        ]
    })
}

proptest! {
    #[test]
    fn kind_matches_children_presence(e in expr()) {
        if let Expr::Node(node) = &e {
            prop_assert!(node.is_constant() != node.is_function());

            let tree = Builder::new().to_tree(&e).unwrap();
            prop_assert_eq!(tree.kind == TreeKind::Constant, node.children().is_none());
            prop_assert_eq!(tree.kind == TreeKind::Function, node.children().is_some());
        }
    }

    #[test]
    fn rendering_is_idempotent(e in expr()) {
        let builder = Builder::new();
        prop_assert_eq!(builder.to_text(&e).unwrap(), builder.to_text(&e).unwrap());
    }

    #[test]
    fn arguments_keep_their_order(a in leaf(), b in leaf(), c in leaf()) {
        let builder = Builder::new();
        let expected = format!(
            "name({},{},{})",
            builder.to_text(&a).unwrap(),
            builder.to_text(&b).unwrap(),
            builder.to_text(&c).unwrap(),
        );
        let node: Expr = Node::function(ResultType::Number, "name", vec![a, b, c]).into();
        prop_assert_eq!(builder.to_text(&node).unwrap(), expected);
    }

    #[test]
    fn dates_become_from_timestamp(ms in -8_000_000_000_000_000i64..8_000_000_000_000_000) {
        let text = Builder::new()
            .to_text(&DateValue::from_timestamp_millis(ms).into())
            .unwrap();
        prop_assert_eq!(text, format!("fromTimestamp({ms})"));
    }

    #[test]
    fn shared_builder_across_threads(e in expr()) {
        let builder = Builder::new();
        let expected = builder.to_text(&e).unwrap();
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let builder = builder.clone();
                let e = e.clone();
                std::thread::spawn(move || builder.to_text(&e).unwrap())
            })
            .collect();
        for handle in handles {
            prop_assert_eq!(handle.join().unwrap(), expected.clone());
        }
    }
}
