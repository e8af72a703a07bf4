use aoc2020::parser::nom_parse_to_owned;

use ring::Ring;

const PUZZLE_INPUT: &str = "523764819";
const FULL_RING_LENGTH: usize = 1_000_000;
const FULL_MOVE_COUNT: usize = 10_000_000;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().nth(1).as_deref() == Some("test") {
        return checks::run_all();
    }

    let labels = nom_parse_to_owned(parser::cup_labels, PUZZLE_INPUT)?;
    let mut ring = Ring::build(&labels, FULL_RING_LENGTH, labels[0])?;
    ring.run(FULL_MOVE_COUNT);

    println!("part 2: {}", product_after_one(&ring));

    Ok(())
}

// The answer is the product of the two labels clockwise of cup 1.
fn product_after_one(ring: &Ring) -> usize {
    ring.sequence_after(1).take(2).product()
}

mod ring {
    use std::fmt;

    pub(super) type Label = usize;

    /// Number of cups picked up per move.
    pub(super) const PICKUP: usize = 3;

    /// Construction argument validation failures. No ring exists for these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) enum InvalidInput {
        EmptySequence,
        /// The destination search needs at least one candidate outside the
        /// picked-up block, so a ring must hold more than `PICKUP` cups.
        TooShort(usize),
        DuplicateLabel(Label),
        LabelOutOfRange(Label),
        StartNotPresent(Label),
    }

    impl fmt::Display for InvalidInput {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                InvalidInput::EmptySequence => write!(f, "initial sequence is empty"),
                InvalidInput::TooShort(length) => {
                    write!(f, "ring of {} cups is too short to play on", length)
                }
                InvalidInput::DuplicateLabel(label) => {
                    write!(f, "duplicate cup label {}", label)
                }
                InvalidInput::LabelOutOfRange(label) => {
                    write!(f, "cup label {} is out of range", label)
                }
                InvalidInput::StartNotPresent(label) => {
                    write!(f, "starting cup {} is not in the ring", label)
                }
            }
        }
    }

    impl std::error::Error for InvalidInput {}

    // Crab cups ring. Cups are stored as a successor table indexed by label
    // (entry 0 unused), so removing and splicing the three picked-up cups
    // touches a constant number of entries no matter how large the ring is.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(super) struct Ring {
        succ: Vec<Label>,
        current: Label,
        length: usize,
    }

    impl Ring {
        /// Chains `initial` in order, pads with `initial.len() + 1..=target_length`,
        /// and closes the cycle back to the first cup. Density of `1..=target_length`
        /// requires `initial` to be a permutation of `1..=initial.len()`.
        pub(super) fn build(
            initial: &[Label],
            target_length: usize,
            start: Label,
        ) -> Result<Self, InvalidInput> {
            if initial.is_empty() {
                return Err(InvalidInput::EmptySequence);
            }
            if target_length <= PICKUP {
                return Err(InvalidInput::TooShort(target_length));
            }

            let limit = initial.len().min(target_length);
            let mut seen = vec![false; limit + 1];
            for &label in initial {
                if label == 0 || label > limit {
                    return Err(InvalidInput::LabelOutOfRange(label));
                }
                if seen[label] {
                    return Err(InvalidInput::DuplicateLabel(label));
                }
                seen[label] = true;
            }

            if start == 0 || start > target_length {
                return Err(InvalidInput::StartNotPresent(start));
            }

            let mut succ = vec![0; target_length + 1];
            let first = initial[0];
            let mut prev = first;
            for &label in &initial[1..] {
                succ[prev] = label;
                prev = label;
            }
            for label in initial.len() + 1..=target_length {
                succ[prev] = label;
                prev = label;
            }
            succ[prev] = first;

            Ok(Ring {
                succ,
                current: start,
                length: target_length,
            })
        }

        fn prev_label(&self, label: Label) -> Label {
            if label == 1 {
                self.length
            } else {
                label - 1
            }
        }

        /// One move: pick up the three cups after the current cup, splice
        /// them back in after the destination cup, step the cursor forward.
        pub(super) fn advance(&mut self) {
            let current = self.current;
            let first = self.succ[current];
            let second = self.succ[first];
            let third = self.succ[second];
            let resume = self.succ[third];
            let picked = [first, second, third];

            // Decrement with wraparound, skipping picked-up cups. At most
            // PICKUP candidates are excluded, so one of the first PICKUP + 1
            // is free and the loop bound is never the exit path.
            let mut destination = self.prev_label(current);
            for _ in 0..=PICKUP {
                if !picked.contains(&destination) {
                    break;
                }
                destination = self.prev_label(destination);
            }

            // Close the gap, then splice the block back in after the
            // destination, preserving its internal order.
            self.succ[current] = resume;
            let after = self.succ[destination];
            self.succ[destination] = first;
            self.succ[third] = after;

            self.current = resume;
        }

        pub(super) fn run(&mut self, count: usize) {
            for _ in 0..count {
                self.advance();
            }
        }

        /// Walks the ring clockwise from the cup after `label`, yielding every
        /// other cup exactly once and stopping before `label` comes around
        /// again. Panics if `label` is not in the ring.
        pub(super) fn sequence_after(&self, label: Label) -> SequenceAfter<'_> {
            SequenceAfter {
                ring: self,
                next: self.succ[label],
                remaining: self.length - 1,
            }
        }
    }

    pub(super) struct SequenceAfter<'a> {
        ring: &'a Ring,
        next: Label,
        remaining: usize,
    }

    impl Iterator for SequenceAfter<'_> {
        type Item = Label;

        fn next(&mut self) -> Option<Self::Item> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;

            let label = self.next;
            self.next = self.ring.succ[label];
            Some(label)
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (self.remaining, Some(self.remaining))
        }
    }

    impl ExactSizeIterator for SequenceAfter<'_> {}
}

mod parser {
    use super::ring::Label;

    use nom::character::complete::satisfy;
    use nom::combinator::{all_consuming, map_res};
    use nom::multi::many1;
    use nom::{IResult, Parser};

    // One cup per digit; 0 never labels a cup.
    pub(super) fn cup_labels(input: &str) -> IResult<&str, Vec<Label>> {
        all_consuming(many1(map_res(satisfy(|c| c.is_ascii_digit()), |c| {
            c.to_digit(10)
                .filter(|&digit| digit > 0)
                .map(|digit| digit as Label)
                .ok_or("cup labels start at 1")
        })))
        .parse(input)
    }
}

mod checks {
    use aoc2020::parser::nom_parse_to_owned;
    use itertools::Itertools;

    use super::parser::cup_labels;
    use super::ring::{Label, Ring};

    enum Expect {
        SequenceAfterOne(&'static str),
        ProductAfterOne(usize),
    }

    struct Check {
        name: &'static str,
        input: &'static str,
        length: usize,
        start: Label,
        moves: usize,
        expect: Expect,
    }

    const CHECKS: &[Check] = &[
        Check {
            name: "10 moves",
            input: "389125467",
            length: 9,
            start: 3,
            moves: 10,
            expect: Expect::SequenceAfterOne("92658374"),
        },
        Check {
            name: "100 moves",
            input: "389125467",
            length: 9,
            start: 3,
            moves: 100,
            expect: Expect::SequenceAfterOne("67384529"),
        },
        Check {
            name: "10 million moves",
            input: "389125467",
            length: 1_000_000,
            start: 3,
            moves: 10_000_000,
            expect: Expect::ProductAfterOne(149_245_887_792),
        },
    ];

    // Mismatches are reported and execution moves on to the next check.
    pub(super) fn run_all() -> Result<(), Box<dyn std::error::Error>> {
        for check in CHECKS {
            let labels = nom_parse_to_owned(cup_labels, check.input)?;
            let mut ring = Ring::build(&labels, check.length, check.start)?;
            ring.run(check.moves);

            match check.expect {
                Expect::SequenceAfterOne(expected) => {
                    let actual = ring.sequence_after(1).join("");
                    if actual != expected {
                        println!("{}: expected {} got {}", check.name, expected, actual);
                    }
                }
                Expect::ProductAfterOne(expected) => {
                    let actual = super::product_after_one(&ring);
                    if actual != expected {
                        println!("{}: expected {} got {}", check.name, expected, actual);
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::InvalidInput;

    fn example_ring(length: usize) -> Ring {
        let labels = nom_parse_to_owned(parser::cup_labels, "389125467").unwrap();
        Ring::build(&labels, length, 3).unwrap()
    }

    #[test]
    fn build_chains_in_input_order() {
        let ring = example_ring(9);
        assert_eq!(
            ring.sequence_after(3).collect::<Vec<_>>(),
            vec![8, 9, 1, 2, 5, 4, 6, 7]
        );
    }

    #[test]
    fn build_pads_counting_up_from_largest() {
        let ring = example_ring(12);
        assert_eq!(
            ring.sequence_after(3).collect::<Vec<_>>(),
            vec![8, 9, 1, 2, 5, 4, 6, 7, 10, 11, 12]
        );
    }

    #[test]
    fn build_covers_every_label_once() {
        let ring = example_ring(9);
        let mut labels = ring.sequence_after(1).collect::<Vec<_>>();
        assert_eq!(labels.len(), 8);
        labels.sort();
        assert_eq!(labels, (2..=9).collect::<Vec<_>>());
    }

    #[test]
    fn ten_moves() {
        let mut ring = example_ring(9);
        ring.run(10);
        assert_eq!(
            ring.sequence_after(1).collect::<Vec<_>>(),
            vec![9, 2, 6, 5, 8, 3, 7, 4]
        );
    }

    #[test]
    fn hundred_moves() {
        let mut ring = example_ring(9);
        ring.run(100);
        assert_eq!(
            ring.sequence_after(1).collect::<Vec<_>>(),
            vec![6, 7, 3, 8, 4, 5, 2, 9]
        );
    }

    #[test]
    fn advance_conserves_labels() {
        let mut ring = example_ring(12);
        ring.run(7);
        let mut labels = ring.sequence_after(1).collect::<Vec<_>>();
        labels.sort();
        assert_eq!(labels, (2..=12).collect::<Vec<_>>());
    }

    #[test]
    fn run_zero_is_a_no_op() {
        let ring = example_ring(9);
        let mut other = ring.clone();
        other.run(0);
        assert_eq!(other, ring);
    }

    #[test]
    fn run_is_deterministic() {
        let mut a = example_ring(9);
        let mut b = example_ring(9);
        a.run(100);
        b.run(100);
        assert_eq!(a, b);
    }

    #[test]
    fn destination_search_wraps_past_whole_block() {
        // The three cups after the current cup 4 are 3, 2 and 1, so every
        // decremented candidate is picked up and the search wraps to 5.
        let mut ring = Ring::build(&[4, 3, 2, 1, 5], 5, 4).unwrap();
        ring.advance();
        assert_eq!(ring.sequence_after(4).collect::<Vec<_>>(), vec![5, 3, 2, 1]);
    }

    #[test]
    fn sequence_after_restarts_from_scratch() {
        let ring = example_ring(9);
        let once = ring.sequence_after(1).collect::<Vec<_>>();
        let twice = ring.sequence_after(1).collect::<Vec<_>>();
        assert_eq!(once, twice);
    }

    #[test]
    fn build_rejects_duplicate_labels() {
        assert_eq!(
            Ring::build(&[3, 1, 3, 2], 4, 3),
            Err(InvalidInput::DuplicateLabel(3))
        );
    }

    #[test]
    fn build_rejects_labels_outside_dense_range() {
        assert_eq!(
            Ring::build(&[1, 2, 3, 5], 5, 1),
            Err(InvalidInput::LabelOutOfRange(5))
        );
        assert_eq!(
            Ring::build(&[0, 1, 2, 3], 4, 1),
            Err(InvalidInput::LabelOutOfRange(0))
        );
    }

    #[test]
    fn build_rejects_absent_start() {
        assert_eq!(
            Ring::build(&[1, 2, 3, 4], 4, 5),
            Err(InvalidInput::StartNotPresent(5))
        );
    }

    #[test]
    fn build_rejects_rings_too_short_to_play() {
        assert_eq!(
            Ring::build(&[1, 2, 3], 3, 1),
            Err(InvalidInput::TooShort(3))
        );
        assert_eq!(Ring::build(&[], 9, 1), Err(InvalidInput::EmptySequence));
    }

    #[test]
    fn start_may_be_a_padded_label() {
        let ring = Ring::build(&[1, 2, 3, 4], 6, 5).unwrap();
        assert_eq!(
            ring.sequence_after(1).collect::<Vec<_>>(),
            vec![2, 3, 4, 5, 6]
        );
    }

    #[test]
    #[ignore = "ten million moves on a million cups, run with --release"]
    fn example_input_million_cups() {
        let labels = nom_parse_to_owned(parser::cup_labels, "389125467").unwrap();
        let mut ring = Ring::build(&labels, 1_000_000, 3).unwrap();
        ring.run(10_000_000);
        assert_eq!(product_after_one(&ring), 149_245_887_792);
    }

    #[test]
    #[ignore = "ten million moves on a million cups, run with --release"]
    fn puzzle_input_regression() {
        let labels = nom_parse_to_owned(parser::cup_labels, PUZZLE_INPUT).unwrap();
        let mut ring = Ring::build(&labels, FULL_RING_LENGTH, labels[0]).unwrap();
        ring.run(FULL_MOVE_COUNT);
        assert_eq!(product_after_one(&ring), 511_780_369_955);
    }

    #[test]
    fn rejects_zero_digit_in_input() {
        assert!(nom_parse_to_owned(parser::cup_labels, "302").is_err());
    }
}
