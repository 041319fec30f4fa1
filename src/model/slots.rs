// File: ./src/model/slots.rs
// Period-slot normalization: "[03-04]节" -> ["03-04"], "3456" -> ["03-04", "05-06"].
use crate::model::item::{SlotLabel, digit_runs};

const PERIOD_UNIT: char = '节';

/// Strips the period unit and surrounding brackets from a raw section line.
pub fn normalize_section(section_text: &str) -> String {
    section_text
        .replace(PERIOD_UNIT, "")
        .trim()
        .trim_matches(|c| c == '[' || c == ']')
        .to_string()
}

/// Period numbers in a normalized label, in original order.
///
/// Digit runs of up to two characters are read as one period number. A
/// longer run has no separators to go by and is read one digit per period,
/// so "3456" yields `[3, 4, 5, 6]`.
pub fn period_numbers(label: &str) -> Vec<u32> {
    fn flush(run: &mut String, nums: &mut Vec<u32>) {
        if run.len() > 2 {
            nums.extend(run.chars().filter_map(|c| c.to_digit(10)));
        } else if !run.is_empty() {
            nums.extend(digit_runs(run));
        }
        run.clear();
    }

    let mut nums = Vec::new();
    let mut run = String::new();
    for c in label.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            flush(&mut run, &mut nums);
        }
    }
    flush(&mut run, &mut nums);
    nums
}

/// Splits a raw section line into slot labels.
///
/// One or two numbers form a single slot; longer sequences are consumed in
/// consecutive pairs with any trailing number as its own slot. A label with
/// no digits is returned as one opaque slot.
pub fn split_section_slots(section_text: &str) -> Vec<SlotLabel> {
    let label = normalize_section(section_text);
    let nums = period_numbers(&label);

    match nums.as_slice() {
        [] => vec![SlotLabel::new(label)],
        [n] => vec![SlotLabel::single(*n)],
        [lo, hi] => vec![SlotLabel::span(*lo, *hi)],
        _ => nums
            .chunks(2)
            .map(|pair| match pair {
                [lo, hi] => SlotLabel::span(*lo, *hi),
                [n] => SlotLabel::single(*n),
                _ => unreachable!("chunks(2) yields one or two items"),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(s: &str) -> Vec<String> {
        split_section_slots(s)
            .into_iter()
            .map(|l| l.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_normalize_section() {
        assert_eq!(normalize_section("[03-04]节"), "03-04");
        assert_eq!(normalize_section(" [01-02-03-04]节 "), "01-02-03-04");
    }

    #[test]
    fn test_single_and_pair() {
        assert_eq!(labels("[05]节"), vec!["05"]);
        assert_eq!(labels("[3-4]节"), vec!["03-04"]);
    }

    #[test]
    fn test_pairs_keep_original_order() {
        assert_eq!(labels("[04-03]节"), vec!["04-03"]);
    }

    #[test]
    fn test_long_sequence_pairs_up() {
        assert_eq!(labels("[01-02-03-04-05]节"), vec!["01-02", "03-04", "05"]);
        assert_eq!(labels("[10-11-12-13]节"), vec!["10-11", "12-13"]);
    }

    #[test]
    fn test_packed_digits_split_per_period() {
        assert_eq!(period_numbers("3456"), vec![3, 4, 5, 6]);
        assert_eq!(labels("3456节"), vec!["03-04", "05-06"]);
    }

    #[test]
    fn test_non_adjacent_pairs_are_preserved() {
        assert_eq!(labels("[01-03-05-07]节"), vec!["01-03", "05-07"]);
    }

    #[test]
    fn test_no_digits_is_opaque() {
        assert_eq!(labels("[午间]节"), vec!["午间"]);
    }

    #[test]
    fn test_slot_count_is_half_of_numbers_rounded_up() {
        for (label, n) in [("1", 1usize), ("1-2", 2), ("1-2-3", 3), ("1-2-3-4-5-6-7", 7)] {
            let expected = n.div_ceil(2);
            assert_eq!(split_section_slots(label).len(), expected, "label {}", label);
        }
    }
}
