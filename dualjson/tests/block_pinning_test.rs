// SPDX-License-Identifier: Apache-2.0

// Pin/release ordering between retained selections and block recycling

use dualjson::{
    ChunkReader, Config, DocumentDialect, ErrorKind, Selection, Tokenizer, UnexpectedState,
};

type TinyTokenizer<'a> = Tokenizer<ChunkReader<'a>, Config<4, 16>>;

fn tokenizer(input: &[u8]) -> TinyTokenizer<'_> {
    Tokenizer::with_config(ChunkReader::new(input, 3))
}

fn advance(tokenizer: &mut TinyTokenizer<'_>) -> bool {
    tokenizer.advance(DocumentDialect::Simplified).unwrap()
}

fn is_stale(tokenizer: &TinyTokenizer<'_>, selection: &Selection) -> bool {
    matches!(
        tokenizer.text(selection).map_err(|e| e.kind().clone()),
        Err(ErrorKind::Unexpected(UnexpectedState::StaleSelection))
    )
}

#[test_log::test]
fn test_retained_selections_released_out_of_order() {
    let input = b"alpha beta gamma delta epsilon zeta eta theta iota kappa\n";
    let mut tokenizer = tokenizer(input);

    let mut kept = Vec::new();
    while advance(&mut tokenizer) {
        let text = tokenizer.current_text().unwrap();
        if ["beta", "delta", "zeta"].contains(&text.as_str()) {
            kept.push((text, tokenizer.retain().unwrap().unwrap()));
        }
    }
    for (text, selection) in &kept {
        assert_eq!(&tokenizer.text(selection).unwrap(), text);
    }

    // Dropping the newest pin first frees nothing: "beta" still holds the chain
    let (_, zeta) = kept.pop().unwrap();
    tokenizer.release(zeta.clone()).unwrap();
    advance(&mut tokenizer);
    let (_, delta) = kept.pop().unwrap();
    assert_eq!(tokenizer.text(&delta).unwrap(), "delta");
    assert!(!is_stale(&tokenizer, &zeta));

    let (_, beta) = kept.pop().unwrap();
    tokenizer.release(beta.clone()).unwrap();
    advance(&mut tokenizer);
    // "beta" is gone, "delta" is now the oldest pin and survives
    assert!(is_stale(&tokenizer, &beta));
    assert_eq!(tokenizer.text(&delta).unwrap(), "delta");

    tokenizer.release(delta.clone()).unwrap();
    advance(&mut tokenizer);
    assert!(is_stale(&tokenizer, &delta));
    assert!(is_stale(&tokenizer, &zeta));
    assert_eq!(tokenizer.pool_stats().live(), 1);
}

#[test_log::test]
fn test_selection_spanning_many_blocks() {
    let input = b"key = \"a string long enough to cross a good number of four byte blocks\" next\n";
    let mut tokenizer = tokenizer(input);
    advance(&mut tokenizer);
    advance(&mut tokenizer);
    advance(&mut tokenizer);
    let long = tokenizer.retain().unwrap().unwrap();
    advance(&mut tokenizer);
    assert_eq!(tokenizer.current_text().unwrap(), "next");
    assert_eq!(
        tokenizer.text(&long).unwrap(),
        "a string long enough to cross a good number of four byte blocks"
    );
    tokenizer.release(long).unwrap();
}

#[test_log::test]
fn test_unpinned_selection_is_reported_not_read() {
    let input = b"first 2 3 4 5 6 7 8 9 10 11 12";
    let mut tokenizer = tokenizer(input);
    advance(&mut tokenizer);
    let copy = tokenizer.token().selection.clone().unwrap();
    while advance(&mut tokenizer) {}
    assert!(is_stale(&tokenizer, &copy));
}

#[test_log::test]
fn test_memory_is_flat_without_pins() {
    let mut input = Vec::new();
    for i in 0..2000 {
        input.extend_from_slice(format!("key{i} = \"value number {i}\"\n").as_bytes());
    }
    let mut tokenizer = tokenizer(&input);
    let mut peak = 0;
    while advance(&mut tokenizer) {
        peak = peak.max(tokenizer.pool_stats().live());
    }
    assert!(peak <= 7, "peak {peak}");
    assert!(tokenizer.pool_stats().allocated <= 8, "{:?}", tokenizer.pool_stats());
}

#[test_log::test]
fn test_memory_grows_only_while_pinned() {
    let mut input = Vec::new();
    for i in 0..200 {
        input.extend_from_slice(format!("k{i} = {i}\n").as_bytes());
    }
    let mut tokenizer = tokenizer(&input);
    advance(&mut tokenizer);
    let first = tokenizer.retain().unwrap().unwrap();
    while advance(&mut tokenizer) {}
    let pinned_peak = tokenizer.pool_stats().live();
    assert!(pinned_peak > input.len() / 4 - 2);
    assert_eq!(tokenizer.text(&first).unwrap(), "k0");

    tokenizer.release(first).unwrap();
    advance(&mut tokenizer);
    let stats = tokenizer.pool_stats();
    assert_eq!(stats.live(), 1);
    assert_eq!(stats.free, stats.allocated - 1);
}
