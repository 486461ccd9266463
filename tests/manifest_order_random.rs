// tests/manifest_order_random.rs
//
// Случайный порядок записи тегов: манифест всегда отдаёт обратный порядок,
// фильтр сохраняет его.
//
// Запуск:
//   cargo test --test manifest_order_random -- --nocapture

use std::path::Path;

use anyhow::Result;
use oorandom::Rand64;

use debugdata::{decode_manifest, encode_manifest, ManifestEntry, ManifestFilter};

#[test]
fn reverse_of_write_order_for_random_sequences() -> Result<()> {
    let mut rng = Rand64::new(0xDEB0_66ED);
    let path = Path::new("index.data");

    for round in 0..50 {
        let n = rng.rand_range(0..40) as usize;
        let mut written: Vec<ManifestEntry> = Vec::with_capacity(n);
        for i in 0..n {
            let tag = format!("{:x}{}", rng.rand_u64(), i);
            written.push(ManifestEntry {
                ajax: rng.rand_range(0..2) == 1,
                method: if rng.rand_range(0..3) == 0 { "POST" } else { "GET" }.into(),
                ..ManifestEntry::new(tag)
            });
        }

        let m = decode_manifest(&encode_manifest(&written)?, path)?;
        assert_eq!(m.len(), n, "round {round}");
        let got: Vec<&str> = m.tags().collect();
        let want: Vec<&str> = written.iter().rev().map(|e| e.tag.as_str()).collect();
        assert_eq!(got, want, "round {round}");

        let filter = ManifestFilter {
            ajax: Some(true),
            ..ManifestFilter::default()
        };
        let got: Vec<&str> = filter.apply(&m).into_iter().map(|(t, _)| t).collect();
        let want: Vec<&str> = written
            .iter()
            .rev()
            .filter(|e| e.ajax)
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(got, want, "round {round}");
    }
    Ok(())
}
