use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn deck(n: usize) -> Vec<u8> {
    let mut deck = String::from("*KEYWORD\n*NODE\n");
    for nid in 1..=n {
        deck.push_str(&format!("{:8}{:16.3}{:16.3}{:16.3}\n", nid, nid as f64, 0.5, -1.25));
    }
    deck.push_str("*ELEMENT_SOLID\n");
    for eid in 1..=n / 8 {
        let first = (eid - 1) * 8 + 1;
        deck.push_str(&format!("{:8}{:8}", eid, 1));
        for nid in first..first + 8 {
            deck.push_str(&format!("{:8}", nid));
        }
        deck.push('\n');
    }
    deck.push_str("*SET_NODE_LIST_TITLE\nall\n1 0.0 0.0 0.0 0.0MECH\n");
    for nid in 1..=n {
        deck.push_str(&format!("{:10}", nid));
        if nid % 8 == 0 {
            deck.push('\n');
        }
    }
    deck.push_str("\n*BOUNDARY_SPC_SET_ID\n1all\n1 0 1 1 1 0 0 0\n*END\n");
    deck.into_bytes()
}

fn criterion_benchmark(c: &mut Criterion) {
    let deck = deck(8000);
    c.bench_function("parse_bytes", |b| {
        b.iter(|| lsdyna::keyword::parse_bytes(black_box(&deck)))
    });
    c.bench_function("convert", |b| b.iter(|| lsdyna::convert(black_box(&deck))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
