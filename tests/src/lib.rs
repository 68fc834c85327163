#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::io::Write;

    use dynamic_array::DynamicArray;
    use ordered_map::{Error, OrderedMap};
    use rand::{thread_rng, Rng};
    use rand_distr::{Distribution, Uniform, Zipf};
    use wordtable_core::WordAnalyzer;

    type K = i64;
    type V = u64;

    const KEY_RANGE: (K, K) = (-1_000, 1_000);

    fn random_map(num: usize) -> (OrderedMap<K, V>, BTreeMap<K, V>) {
        let mut rng = thread_rng();
        let key_dist = Uniform::new(KEY_RANGE.0, KEY_RANGE.1);

        let mut map = OrderedMap::new();
        let mut reference = BTreeMap::new();

        for _ in 0..num {
            let key = key_dist.sample(&mut rng);
            let value = rng.gen::<V>();

            assert_eq!(map.put(key, value), reference.insert(key, value));
        }

        (map, reference)
    }

    #[test]
    fn keys_strictly_ascending() {
        let (map, reference) = random_map(5_000);

        let keys = map.all_keys();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(keys, reference.keys().copied().collect::<Vec<_>>());
        assert_eq!(map.len(), reference.len());
    }

    #[test]
    fn rank_matches_linear_count() {
        let (map, reference) = random_map(1_000);

        for key in KEY_RANGE.0 - 10..KEY_RANGE.1 + 10 {
            let expected = reference.keys().filter(|&&k| k < key).count();
            assert_eq!(map.rank(&key), expected);
        }
    }

    #[test]
    fn select_inverts_rank() {
        let (map, reference) = random_map(1_000);

        for (i, key) in reference.keys().enumerate() {
            assert_eq!(map.select(i), Ok(key));
            assert_eq!(map.rank(key), i);
        }

        assert_eq!(
            map.select(map.len()),
            Err(Error::IndexOutOfRange {
                index: map.len(),
                len: map.len()
            })
        );
    }

    #[test]
    fn floor_and_ceiling_match_reference() {
        let (map, reference) = random_map(500);

        for key in KEY_RANGE.0 - 10..KEY_RANGE.1 + 10 {
            assert_eq!(map.floor(&key), reference.range(..=key).next_back().map(|(k, _)| k));
            assert_eq!(map.ceiling(&key), reference.range(key..).next().map(|(k, _)| k));
        }

        let min = *map.min().unwrap();
        let max = *map.max().unwrap();
        assert_eq!(map.floor(&(min - 1)), None);
        assert_eq!(map.ceiling(&(max + 1)), None);
    }

    #[test]
    fn ranges_match_reference() {
        let (map, reference) = random_map(2_000);

        let mut rng = thread_rng();
        let key_dist = Uniform::new(KEY_RANGE.0 - 50, KEY_RANGE.1 + 50);

        for _ in 0..2_000 {
            let lo = key_dist.sample(&mut rng);
            let hi = key_dist.sample(&mut rng);

            if lo > hi {
                assert_eq!(map.range_len(&lo, &hi), 0);
                assert!(map.range_keys(&lo, &hi).is_empty());
                continue;
            }

            let expected: Vec<K> = reference.range(lo..=hi).map(|(k, _)| *k).collect();
            assert_eq!(map.range_len(&lo, &hi), expected.len());
            assert_eq!(map.range_keys(&lo, &hi), expected);
        }
    }

    #[test]
    fn mixed_operations_match_reference() {
        let mut rng = thread_rng();
        let key_dist = Uniform::new(0, 300);

        let mut map: OrderedMap<K, V> = OrderedMap::new();
        let mut reference = BTreeMap::new();

        for step in 0..20_000 {
            let key = key_dist.sample(&mut rng);

            match rng.gen_range(0..6) {
                0 | 1 => {
                    let value = rng.gen::<V>();
                    assert_eq!(map.put(key, value), reference.insert(key, value));
                    assert_eq!(map.get(&key), Some(&value));
                }
                2 => {
                    assert_eq!(map.delete(&key), reference.remove(&key));
                    assert!(!map.contains(&key));
                }
                3 => {
                    let expected = reference.pop_first();
                    match expected {
                        Some(pair) => assert_eq!(map.delete_min(), Ok(pair)),
                        None => assert_eq!(map.delete_min(), Err(Error::EmptyCollection)),
                    }
                }
                4 => {
                    let expected = reference.pop_last();
                    match expected {
                        Some(pair) => assert_eq!(map.delete_max(), Ok(pair)),
                        None => assert_eq!(map.delete_max(), Err(Error::EmptyCollection)),
                    }
                }
                _ => {
                    let value = rng.gen::<bool>().then(|| rng.gen::<V>());
                    let expected = match value {
                        Some(value) => reference.insert(key, value),
                        None => reference.remove(&key),
                    };
                    assert_eq!(map.put_optional(Some(key), value), Ok(expected));
                }
            }

            assert_eq!(map.len(), reference.len());
            assert!(map.capacity() >= map.len());

            if step % 1_000 == 0 {
                let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
                let expected: Vec<_> = reference.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(pairs, expected);
            }
        }
    }

    #[test]
    fn dynamic_array_matches_vec() {
        let mut rng = thread_rng();

        let mut array = DynamicArray::new();
        let mut reference = Vec::new();

        // Walk the length to random targets so the buffer repeatedly grows
        // and shrinks through several capacities.
        for _ in 0..40 {
            let target = rng.gen_range(0..2_000);

            while reference.len() != target {
                if reference.len() < target {
                    let index = rng.gen_range(0..=reference.len());
                    let item = rng.gen::<u32>();
                    array.insert(index, item).unwrap();
                    reference.insert(index, item);
                } else {
                    let index = rng.gen_range(0..reference.len());
                    assert_eq!(array.remove(index), Ok(reference.remove(index)));
                }

                assert_eq!(array.len(), reference.len());
                assert!(array.capacity() >= array.len());
                assert!(array.capacity().is_power_of_two());
            }
        }

        assert_eq!(array.as_slice(), reference.as_slice());

        let len = array.len();
        assert_eq!(
            array.insert(len + 1, 0),
            Err(Error::IndexOutOfRange {
                index: len + 1,
                len
            })
        );
    }

    #[test]
    fn dynamic_array_drains_to_small_capacity() {
        let mut array: DynamicArray<u32> = (0..4_096).collect();
        assert_eq!(array.capacity(), 4_096);

        while array.len() > 1 {
            array.remove(0).unwrap();
            assert!(array.capacity() >= array.len());
            assert!(array.capacity() < 4 * array.len());
        }

        assert_eq!(array.as_slice(), [4_095]);
        assert_eq!(array.capacity(), 2);
    }

    #[test]
    fn word_counts_match_reference() -> wordtable_core::Result<()> {
        let vocabulary = [
            "principio", "creó", "Dios", "cielos", "tierra", "estaba", "desordenada", "vacía",
            "tinieblas", "sobre", "faz", "abismo", "Espíritu", "movía", "aguas", "luz",
        ];

        let mut rng = thread_rng();
        let zipf = Zipf::new(vocabulary.len() as u64, 1.1).unwrap();

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("text.txt");
        let mut file = std::fs::File::create(&path)?;

        let mut reference: HashMap<String, usize> = HashMap::new();
        let mut total = 0;

        for _ in 0..500 {
            let line: Vec<&str> = (0..12)
                .map(|_| vocabulary[zipf.sample(&mut rng) as usize - 1])
                .collect();
            writeln!(file, "{},", line.join(" "))?;

            for word in line {
                *reference
                    .entry(wordtable_core::normalize_word(word))
                    .or_default() += 1;
                total += 1;
            }
        }
        drop(file);

        let mut analyzer = WordAnalyzer::new();
        assert_eq!(analyzer.process_file(&path)?, 500);

        assert_eq!(analyzer.total_words(), total);
        assert_eq!(analyzer.unique_words(), reference.len());
        for (word, count) in &reference {
            assert_eq!(analyzer.frequency(word), *count);
        }

        let mut expected: Vec<_> = reference.keys().cloned().collect();
        expected.sort();
        assert_eq!(analyzer.sorted_words(), expected);

        for letter in 'a'..='z' {
            let expected: usize = reference
                .iter()
                .filter(|(word, _)| word.starts_with(letter))
                .map(|(_, count)| count)
                .sum();
            assert_eq!(analyzer.occurrences_starting_with(letter), expected);
        }

        assert_eq!(analyzer.paragraphs().len(), 1);
        assert_eq!(analyzer.paragraph(1).map(|p| p.word_count()), Some(total));

        let max = reference.values().copied().max().unwrap();
        assert_eq!(analyzer.most_frequent().map(|(_, count)| count), Some(max));

        Ok(())
    }
}
