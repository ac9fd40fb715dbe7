use crate::strategy::smoothing::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//direction of a crossover of the short signal relative to the long one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub direction: CrossDirection,
}

//first index at which both signals are defined
pub fn first_valid_index(short: &Signal, long: &Signal) -> usize {
    short.first_valid.max(long.first_valid)
}

//checks for a crossover between index i-1 and index i
//returns none at index 0, during warm-up, or when the signals merely touch
pub fn crossover_at(short: &Signal, long: &Signal, i: usize) -> Option<CrossDirection> {
    if i == 0 {
        return None;
    }

    let (prev_short, prev_long) = (short.get(i - 1)?, long.get(i - 1)?);
    let (cur_short, cur_long) = (short.get(i)?, long.get(i)?);

    //bullish crossover short crosses above long
    if prev_short <= prev_long && cur_short > cur_long {
        return Some(CrossDirection::Up);
    }
    //bearish crossover short crosses below long
    if prev_short >= prev_long && cur_short < cur_long {
        return Some(CrossDirection::Down);
    }
    None
}

//scans every index strictly after `first_valid` and collects crossovers in order
pub fn detect(
    short: &Signal,
    long: &Signal,
    first_valid: usize,
    timestamps: &[DateTime<Utc>],
) -> Vec<CrossoverEvent> {
    let len = short.len().min(long.len()).min(timestamps.len());

    (first_valid + 1..len)
        .filter_map(|i| {
            crossover_at(short, long, i).map(|direction| CrossoverEvent {
                index: i,
                timestamp: timestamps[i],
                direction,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingKind;
    use chrono::TimeZone;

    fn signal(values: Vec<f64>, first_valid: usize) -> Signal {
        Signal {
            kind: SmoothingKind::Sma,
            window: first_valid + 1,
            values,
            first_valid,
        }
    }

    fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn emits_up_and_down_in_order() {
        let short = signal(vec![1.0, 3.0, 4.0, 1.0], 0);
        let long = signal(vec![2.0, 2.0, 2.0, 2.0], 0);

        let events = detect(&short, &long, 0, &timestamps(4));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 1);
        assert_eq!(events[0].direction, CrossDirection::Up);
        assert_eq!(events[1].index, 3);
        assert_eq!(events[1].direction, CrossDirection::Down);
    }

    #[test]
    fn ties_do_not_trigger() {
        //touches at index 1, only crosses strictly at index 2
        let short = signal(vec![1.0, 2.0, 3.0, 2.0, 2.5], 0);
        let long = signal(vec![2.0, 2.0, 2.0, 2.0, 2.0], 0);

        let events = detect(&short, &long, 0, &timestamps(5));
        let found: Vec<_> = events.iter().map(|e| (e.index, e.direction)).collect();

        //index 3 is a tie, the rise out of it at index 4 counts as up
        assert_eq!(
            found,
            vec![(2, CrossDirection::Up), (4, CrossDirection::Up)]
        );
    }

    #[test]
    fn first_valid_index_is_never_an_event() {
        let short = signal(vec![f64::NAN, 3.0, 4.0], 1);
        let long = signal(vec![f64::NAN, 2.0, 5.0], 1);

        assert_eq!(first_valid_index(&short, &long), 1);
        assert_eq!(crossover_at(&short, &long, 1), None);

        let events = detect(&short, &long, 1, &timestamps(3));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, CrossDirection::Down);
    }

    #[test]
    fn warmup_values_are_never_read() {
        //the warm-up slot holds a value that would look like a crossover
        let short = signal(vec![0.0, 5.0, 5.0], 1);
        let long = signal(vec![9.0, 1.0, 1.0], 1);

        assert_eq!(crossover_at(&short, &long, 1), None);
        assert!(detect(&short, &long, 1, &timestamps(3)).is_empty());
    }
}
