// Behavioural scenarios for the parsing and normalization stages.
use kebiao::model::grid::CELL_SEPARATOR;
use kebiao::model::parser::{BlockScanner, Discard};
use kebiao::model::{
    AssemblerConfig, CourseEvent, EventAssembler, Grid, SlotLabel, expand_weeks,
    parse_cell_courses, split_section_slots,
};

fn weeks(s: &str) -> Vec<u32> {
    expand_weeks(s).iter().collect()
}

#[test]
fn test_week_spec_with_odd_marker() {
    // "3-5,7" expands to 3,4,5,7; the odd filter leaves 3,5,7.
    assert_eq!(weeks("3-5,7(单)"), vec![3, 5, 7]);
}

#[test]
fn test_expansion_is_strictly_increasing_and_bounded() {
    let inputs = [
        "1-16[周]",
        "2,4,6,8-10(双)",
        "9-12,1-3,2",
        "1,1,1",
        "5-7，3[周]",
        "x-9,12-14",
    ];
    for input in inputs {
        let out = weeks(input);
        assert!(out.windows(2).all(|w| w[0] < w[1]), "{} -> {:?}", input, out);
        if let (Some(first), Some(last)) = (out.first(), out.last()) {
            assert!(*first >= 1 && *last <= 16, "{} -> {:?}", input, out);
        }
    }
}

#[test]
fn test_parity_filter_idempotent() {
    for (raw, marker) in [("1-15(单)", "(单)"), ("1-16(双)", "(双)")] {
        let once = expand_weeks(raw);
        let list: Vec<String> = once.iter().map(|w| w.to_string()).collect();
        let twice = expand_weeks(&format!("{}{}", list.join(","), marker));
        assert_eq!(once, twice);
    }
}

#[test]
fn test_packed_period_label() {
    let slots: Vec<String> = split_section_slots("3456")
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(slots, vec!["03-04", "05-06"]);
}

#[test]
fn test_slot_labels_are_zero_padded() {
    for slot in split_section_slots("[1-2-3-4-5]节") {
        for part in slot.as_str().split('-') {
            assert_eq!(part.len(), 2, "slot {}", slot);
        }
    }
}

#[test]
fn test_well_formed_block_and_missing_section() {
    let courses = parse_cell_courses("编译原理\n王老师\n3-5周\n教三-101\n3-4节");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "编译原理");
    assert_eq!(courses[0].teacher.as_deref(), Some("王老师"));
    assert_eq!(courses[0].week_spec, "3-5周");
    assert_eq!(courses[0].place, "教三-101");
    assert_eq!(courses[0].section_label, "3-4节");

    assert!(parse_cell_courses("编译原理\n王老师\n3-5周\n教三-101").is_empty());
}

#[test]
fn test_anchor_at_index_one_without_section_contributes_nothing() {
    let cell = "王老师\n3-5周\n教三-101";
    let outcomes: Vec<_> = BlockScanner::new(cell).collect();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].line, 1);
    assert_eq!(outcomes[0].result, Err(Discard::MissingSection));

    let courses = parse_cell_courses(cell);
    assert!(courses.is_empty());
    let assembler = EventAssembler::new(AssemblerConfig::default());
    let events: Vec<CourseEvent> = courses
        .iter()
        .flat_map(|c| assembler.assemble(c, 1, (3, 4)))
        .collect();
    assert!(events.is_empty());
}

fn event(text: &str) -> CourseEvent {
    CourseEvent {
        week: 3,
        weekday: 2,
        slot: SlotLabel::new("03-04"),
        display_text: text.to_string(),
        name: text.to_string(),
        place: String::new(),
        teacher: None,
        rows: (5, 6),
    }
}

#[test]
fn test_shared_cell_rendering_vs_occurrences() {
    let events = vec![event("B[英] R202"), event("A[中] R101")];
    let grid = Grid::build(&events);
    let slot = SlotLabel::new("03-04");

    assert_eq!(grid.cell_text(3, &slot, 2), "A[中] R101 ｜ B[英] R202");
    assert!(grid.cell_text(3, &slot, 2).contains(CELL_SEPARATOR));
    // Both occurrences remain for the calendar.
    assert_eq!(grid.cell(3, &slot, 2).len(), 2);
    assert_eq!(events.len(), 2);
}
