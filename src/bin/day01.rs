use aoc2020::parser::{base10_numeric, read_from_stdin_and_parse};
use itertools::Itertools;
use nom::character::complete::line_ending;
use nom::multi::separated_list1;
use nom::{IResult, Parser};

const TARGET: u64 = 2020;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let entries = read_from_stdin_and_parse(parse_input)?;

    let pair = pair_product(&entries).ok_or("no two entries sum to 2020")?;
    println!("part 1: {}", pair);

    let triple = triple_product(&entries).ok_or("no three entries sum to 2020")?;
    println!("part 2: {}", triple);

    Ok(())
}

fn pair_product(entries: &[u64]) -> Option<u64> {
    entries
        .iter()
        .copied()
        .tuple_combinations()
        .find(|&(a, b)| a + b == TARGET)
        .map(|(a, b)| a * b)
}

fn triple_product(entries: &[u64]) -> Option<u64> {
    entries
        .iter()
        .copied()
        .tuple_combinations()
        .find(|&(a, b, c)| a + b + c == TARGET)
        .map(|(a, b, c)| a * b * c)
}

fn parse_input(input: &str) -> IResult<&str, Vec<u64>> {
    separated_list1(line_ending, base10_numeric).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [u64; 6] = [1721, 979, 366, 299, 675, 1456];

    #[test]
    fn finds_the_pair() {
        assert_eq!(pair_product(&EXAMPLE), Some(514579));
    }

    #[test]
    fn finds_the_triple() {
        assert_eq!(triple_product(&EXAMPLE), Some(241861950));
    }

    #[test]
    fn reports_when_no_pair_exists() {
        assert_eq!(pair_product(&[1, 2, 3]), None);
    }

    #[test]
    fn parses_one_entry_per_line() {
        let (rest, entries) = parse_input("1721\n979\n366\n").unwrap();
        assert_eq!(entries, vec![1721, 979, 366]);
        assert_eq!(rest, "\n");
    }
}
