use pretty_assertions::assert_eq;
use trace_cost_studio::aggregator::{exclusive_cost, CostAggregator, SelfCost};
use trace_cost_studio::parser::{parse_trace_str, TraceNode};
use trace_cost_studio::signature::Signature;

fn sorted(mut samples: Vec<i64>) -> Vec<i64> {
    samples.sort_unstable();
    samples
}

#[test]
fn test_nested_invoke_same_target() {
    let xml = r#"<root>
        <kernel_invoke ins="1000">
            <invoke kind="native" package="Faucet" function="free"/>
            <kernel_invoke ins="200">
                <invoke kind="native" package="Faucet" function="free"/>
            </kernel_invoke>
        </kernel_invoke>
    </root>"#;

    let mut agg = CostAggregator::new();
    agg.ingest(&parse_trace_str(xml).unwrap());
    let table = agg.finalize();

    assert_eq!(table.len(), 1);
    let entry = table.get("kernel_invoke::native::Faucet::free").unwrap();
    assert_eq!(sorted(entry.samples.clone()), vec![200, 800]);
}

#[test]
fn test_nested_invoke_distinct_targets() {
    let xml = r#"<root>
        <kernel_invoke ins="1000">
            <invoke kind="native" package="Faucet" function="free"/>
            <kernel_invoke ins="200">
                <invoke kind="wasm" package="Radiswap" function="swap"/>
            </kernel_invoke>
        </kernel_invoke>
    </root>"#;

    let mut agg = CostAggregator::new();
    agg.ingest(&parse_trace_str(xml).unwrap());
    let table = agg.finalize();

    assert_eq!(
        table.get("kernel_invoke::native::Faucet::free").unwrap().samples,
        vec![800]
    );
    assert_eq!(
        table.get("kernel_invoke::wasm::Radiswap::swap").unwrap().samples,
        vec![200]
    );
}

#[test]
fn test_early_return_aggregated_zero_times() {
    let xml = r#"<root><kernel_invoke ins="0" return="true"/></root>"#;

    let mut agg = CostAggregator::new();
    agg.ingest(&parse_trace_str(xml).unwrap());
    let table = agg.finalize();

    assert_eq!(table.total_samples(), 0);
    assert_eq!(table.counters.excluded_early_returns, 1);
}

#[test]
fn test_early_return_chain_excluded() {
    // Zero-cost wrapper around an early-returning call: neither is a sample.
    let xml = r#"<root>
        <kernel_invoke ins="0">
            <before_invoke ins="0" size="10" return="true"/>
        </kernel_invoke>
        <kernel_drop_node ins="7"/>
    </root>"#;

    let root = parse_trace_str(xml).unwrap();
    for node in root.iter().filter(|n| n.instructions() == Some(0)) {
        assert_eq!(exclusive_cost(node), SelfCost::ReturnedEarly);
    }

    let mut agg = CostAggregator::new();
    agg.ingest(&root);
    let table = agg.finalize();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("kernel_drop_node").unwrap().samples, vec![7]);
    assert_eq!(table.counters.excluded_early_returns, 2);
}

#[test]
fn test_separately_metered_child_has_own_entry() {
    let xml = r#"<root>
        <kernel_invoke ins="5000">
            <invoke kind="native" package="Account" function="lock_fee"/>
            <execute>
                <crypto_utils_keccak256_hash ins="1200" size="64" multiplier="8"/>
            </execute>
        </kernel_invoke>
    </root>"#;

    let mut agg = CostAggregator::new();
    agg.ingest(&parse_trace_str(xml).unwrap());
    let table = agg.finalize();

    assert_eq!(
        table.get("kernel_invoke::native::Account::lock_fee").unwrap().samples,
        vec![3800]
    );
    let hash = table.get("crypto_utils_keccak256_hash::64").unwrap();
    assert_eq!(hash.samples, vec![1200]);
    assert_eq!(hash.signature.base, "crypto_utils_keccak256_hash");
}

#[test]
fn test_sibling_order_irrelevant() {
    let a = TraceNode::new("root")
        .with_child(TraceNode::new("kernel_drop_node").with_instructions(10))
        .with_child(TraceNode::new("kernel_create_node").with_instructions(20));
    let b = TraceNode::new("root")
        .with_child(TraceNode::new("kernel_create_node").with_instructions(20))
        .with_child(TraceNode::new("kernel_drop_node").with_instructions(10));

    let mut agg_a = CostAggregator::new();
    agg_a.ingest(&a);
    let mut agg_b = CostAggregator::new();
    agg_b.ingest(&b);

    assert_eq!(agg_a.finalize(), agg_b.finalize());
}

#[test]
fn test_overflow_sample_dropped() {
    let mut agg = CostAggregator::new();
    agg.record(Signature::bare("kernel_drop_node"), i128::from(u64::MAX));
    agg.record(Signature::bare("kernel_drop_node"), 12);
    let table = agg.finalize();

    assert_eq!(table.get("kernel_drop_node").unwrap().samples, vec![12]);
    assert_eq!(table.counters.overflow_samples, 1);
}

#[test]
fn test_negative_exclusive_cost_kept() {
    let root = TraceNode::new("kernel_invoke").with_instructions(100).with_child(
        TraceNode::new("kernel_invoke").with_instructions(150),
    );

    let mut agg = CostAggregator::new();
    agg.ingest(&root);
    let table = agg.finalize();

    assert_eq!(table.get("kernel_invoke").unwrap().samples.len(), 2);
    assert!(table.get("kernel_invoke").unwrap().samples.contains(&-50));
    assert_eq!(table.counters.negative_samples, 1);
}

fn wrapped_invoke(wrappers: usize) -> String {
    let open: String = (0..wrappers).map(|i| format!("<frame_{}>", i)).collect();
    let close: String = (0..wrappers).rev().map(|i| format!("</frame_{}>", i)).collect();
    format!(
        r#"<root><kernel_invoke ins="1000">{}<kernel_invoke ins="50"/>{}</kernel_invoke></root>"#,
        open, close
    )
}

#[test]
fn test_nested_search_crosses_five_intervening_nodes() {
    let root = parse_trace_str(&wrapped_invoke(5)).unwrap();
    assert_eq!(exclusive_cost(&root.children[0]), SelfCost::Exclusive(950));

    let root = parse_trace_str(&wrapped_invoke(6)).unwrap();
    assert_eq!(exclusive_cost(&root.children[0]), SelfCost::Exclusive(1000));
}

#[test]
fn test_sized_and_unsized_shapes_never_share_an_entry() {
    let xml = r#"<root>
        <kernel_drain_substates ins="70" count="5"/>
        <kernel_drain_substates ins="90" module="5"/>
        <kernel_drain_substates ins="30" module="Main" count="5"/>
    </root>"#;

    let mut agg = CostAggregator::new();
    agg.ingest(&parse_trace_str(xml).unwrap());
    let table = agg.finalize();

    assert!(table.get("kernel_drain_substates::5").is_none());
    assert_eq!(table.counters.conflicting_samples, 2);
    let main = table.get("kernel_drain_substates::Main::5").unwrap();
    assert_eq!(main.signature.size, Some(5));
    assert_eq!(main.samples, vec![30]);
}

#[test]
fn test_large_in_range_sample_not_counted_as_overflow() {
    let mut agg = CostAggregator::new();
    agg.record(Signature::bare("kernel_drop_node"), i128::from(i64::MAX) + 7);
    let table = agg.finalize();

    assert_eq!(table.counters.overflow_samples, 0);
    assert_eq!(table.counters.unrepresentable_samples, 1);
}
