//! Build a few detector records, damage some, and show what the validator
//! and the dump helpers report for each.
//!
//! Run with `RUST_LOG=warn` to see the validator's own diagnostics.

use fragment_codec::{
    dump_hits, DetectorFragment, DetectorFragmentWriter, DetectorValidator, HexDump,
    OverlayResult, ValidationConfig,
};
use fragment_types::{Fragment, FragmentBuffer};
use tracing_subscriber::EnvFilter;

fn build_record(hits: &[(u8, u16)], unixtime: i32) -> OverlayResult<Fragment> {
    let mut fragment = Fragment::new();
    let mut writer = DetectorFragmentWriter::new(&mut fragment)?;
    writer.set_module_num(3)?;
    writer.set_unixtime(unixtime)?;
    writer.set_fifty_mhz_time(12_345_678)?;
    writer.write_hits(hits)?;
    Ok(fragment)
}

fn inspect(label: &str, fragment: &Fragment, config: &ValidationConfig) {
    println!("== {} ==", label);
    if let Ok(reader) = DetectorFragment::new(fragment) {
        println!("{}", reader);
    }
    print!("{}", HexDump(fragment.payload_bytes()));
    println!("{}", dump_hits(fragment, config.dump.max_hits));

    let validator = DetectorValidator::with_config(fragment, config.clone());
    println!("good event: {}", validator.is_good_event());
    println!("{}\n", validator.report());
}

fn main() -> OverlayResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ValidationConfig::from_env();

    let good = build_record(&[(0, 12), (17, 2000), (63, 4095)], 1_700_000_000)?;
    inspect("plausible record", &good, &config);

    let stale = build_record(&[(70, 5000)], 1_000)?;
    inspect("bad channel, bad ADC, stale timestamp", &stale, &config);

    let mut truncated = good.clone().into_payload();
    truncated.truncate(16);
    inspect(
        "truncated in transit",
        &Fragment::from_payload_bytes(&truncated),
        &config,
    );

    Ok(())
}
