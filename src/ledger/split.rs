//! Split calculator
//!
//! Turns an expense total plus raw per-participant inputs into the shares that
//! get stored with the expense. Whatever the mode, a successful split always
//! adds up to the total to the cent.

use crate::error::{SplitbookError, SplitbookResult};
use crate::models::{Money, Percent, Share, ShareInput, SplitMode};

/// Compute the committed shares for an expense
///
/// - `Equal`: `total / n` rounded to the cent for everyone; the last
///   participant (in input order) absorbs the rounding remainder.
/// - `Exact`: amounts are taken as given and must add up to `total`.
/// - `Percent`: percentages must add up to 100.00%; each share is rounded to
///   the cent and the last participant absorbs the remainder.
///
/// The `Equal` remainder is up to `n / 2` cents, so from four
/// participants on the last share can sit more than a cent away from the
/// others: 100.00 among seven is 14.29 six times and 14.26 for the last, and
/// 0.02 among four leaves the last share at -0.01.
///
/// Repeated participant IDs collapse into one share: the first position is
/// kept and the last value wins.
///
/// # Errors
///
/// Returns [`SplitbookError::Validation`] when `inputs` is empty, when a
/// value is negative, when EXACT/PERCENT inputs don't add up, or when the
/// values are too large to add up at all.
pub fn compute_shares(
    total: Money,
    mode: SplitMode,
    inputs: &[ShareInput],
) -> SplitbookResult<Vec<Share>> {
    let inputs = dedup_inputs(inputs);
    if inputs.is_empty() {
        return Err(SplitbookError::Validation(
            "An expense must be split among at least one participant".into(),
        ));
    }

    match mode {
        SplitMode::Equal => split_equal(total, &inputs),
        SplitMode::Exact => split_exact(total, &inputs),
        SplitMode::Percent => split_percent(total, &inputs),
    }
}

fn dedup_inputs(inputs: &[ShareInput]) -> Vec<ShareInput> {
    let mut unique: Vec<ShareInput> = Vec::with_capacity(inputs.len());
    for input in inputs {
        match unique
            .iter_mut()
            .find(|u| u.participant_id == input.participant_id)
        {
            Some(existing) => *existing = input.clone(),
            None => unique.push(input.clone()),
        }
    }
    unique
}

fn split_equal(total: Money, inputs: &[ShareInput]) -> SplitbookResult<Vec<Share>> {
    let per_person = total
        .divide_rounded(inputs.len())
        .ok_or_else(|| SplitbookError::Validation("Cannot split among zero participants".into()))?;

    let mut shares: Vec<Share> = inputs
        .iter()
        .map(|input| Share::new(input.participant_id, per_person))
        .collect();

    absorb_remainder(&mut shares, total)?;
    Ok(shares)
}

fn split_exact(total: Money, inputs: &[ShareInput]) -> SplitbookResult<Vec<Share>> {
    let shares: Vec<Share> = inputs
        .iter()
        .map(|input| Share::new(input.participant_id, input.amount.unwrap_or_default()))
        .collect();

    if shares.iter().any(|s| s.amount.is_negative()) {
        return Err(SplitbookError::Validation(
            "Share amounts cannot be negative".into(),
        ));
    }

    let sum = Money::checked_sum(shares.iter().map(|s| s.amount)).ok_or_else(too_large)?;
    if sum != total {
        return Err(SplitbookError::Validation(format!(
            "Share amounts ({}) do not match the expense total ({})",
            sum, total
        )));
    }

    Ok(shares)
}

fn split_percent(total: Money, inputs: &[ShareInput]) -> SplitbookResult<Vec<Share>> {
    let percents: Vec<Percent> = inputs
        .iter()
        .map(|input| input.percent.unwrap_or(Percent::zero()))
        .collect();

    if percents.iter().any(|p| p.hundredths() < 0) {
        return Err(SplitbookError::Validation(
            "Percentages cannot be negative".into(),
        ));
    }

    let sum = Percent::checked_sum(percents.iter().copied()).ok_or_else(too_large)?;
    if sum != Percent::WHOLE {
        return Err(SplitbookError::Validation(format!(
            "Percentages must add up to 100.00% (got {})",
            sum
        )));
    }

    let mut shares: Vec<Share> = inputs
        .iter()
        .zip(percents)
        .map(|(input, percent)| Share {
            participant_id: input.participant_id,
            amount: total.percentage(percent),
            percent: Some(percent),
        })
        .collect();

    absorb_remainder(&mut shares, total)?;
    Ok(shares)
}

/// Give whatever rounding left over to the last share
fn absorb_remainder(shares: &mut [Share], total: Money) -> SplitbookResult<()> {
    let sum = Money::checked_sum(shares.iter().map(|s| s.amount)).ok_or_else(too_large)?;
    let remainder = total.checked_sub(sum).ok_or_else(too_large)?;
    if let Some(last) = shares.last_mut() {
        last.amount = last.amount.checked_add(remainder).ok_or_else(too_large)?;
    }
    Ok(())
}

fn too_large() -> SplitbookError {
    SplitbookError::Validation("Share values are too large to add up".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipantId;

    fn ids(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    fn amounts(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.cents()).collect()
    }

    fn sum(shares: &[Share]) -> Money {
        shares.iter().map(|s| s.amount).sum()
    }

    #[test]
    fn test_equal_split_exact_division() {
        let people = ids(4);
        let inputs: Vec<_> = people.iter().map(|id| ShareInput::equal(*id)).collect();

        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Equal, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![2500, 2500, 2500, 2500]);
    }

    #[test]
    fn test_equal_split_remainder_goes_to_last() {
        let people = ids(3);
        let inputs: Vec<_> = people.iter().map(|id| ShareInput::equal(*id)).collect();

        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Equal, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![3333, 3333, 3334]);
        assert_eq!(shares[2].participant_id, people[2]);
        assert_eq!(sum(&shares), Money::from_cents(10_000));
    }

    #[test]
    fn test_equal_split_rounding_up_is_corrected_on_last() {
        // 200.00 / 3 = 66.666.. -> 66.67 each, last pays 66.66
        let people = ids(3);
        let inputs: Vec<_> = people.iter().map(|id| ShareInput::equal(*id)).collect();

        let shares = compute_shares(Money::from_cents(20_000), SplitMode::Equal, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![6667, 6667, 6666]);
    }

    #[test]
    fn test_equal_split_shares_within_a_cent() {
        let people = ids(3);
        let inputs: Vec<_> = people.iter().map(|id| ShareInput::equal(*id)).collect();

        for cents in [1, 2, 100, 101, 9_999, 10_000, 12_345, 99_998] {
            let total = Money::from_cents(cents);
            let shares = compute_shares(total, SplitMode::Equal, &inputs).unwrap();
            assert_eq!(sum(&shares), total, "total {}", cents);

            let max = shares.iter().map(|s| s.amount).max().unwrap();
            let min = shares.iter().map(|s| s.amount).min().unwrap();
            assert!((max - min).cents() <= 1, "total {}: {:?}", cents, amounts(&shares));
        }
    }

    #[test]
    fn test_equal_split_last_share_absorbs_whole_remainder() {
        let seven: Vec<_> = ids(7).into_iter().map(ShareInput::equal).collect();
        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Equal, &seven).unwrap();
        assert_eq!(amounts(&shares), vec![1429, 1429, 1429, 1429, 1429, 1429, 1426]);

        let four: Vec<_> = ids(4).into_iter().map(ShareInput::equal).collect();
        let shares = compute_shares(Money::from_cents(2), SplitMode::Equal, &four).unwrap();
        assert_eq!(amounts(&shares), vec![1, 1, 1, -1]);
        assert_eq!(sum(&shares), Money::from_cents(2));
    }

    #[test]
    fn test_equal_split_single_participant() {
        let person = ParticipantId::new();
        let shares = compute_shares(
            Money::from_cents(1234),
            SplitMode::Equal,
            &[ShareInput::equal(person)],
        )
        .unwrap();
        assert_eq!(shares, vec![Share::new(person, Money::from_cents(1234))]);
    }

    #[test]
    fn test_exact_split() {
        let people = ids(2);
        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(7000)),
            ShareInput::exact(people[1], Money::from_cents(3000)),
        ];

        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Exact, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![7000, 3000]);
    }

    #[test]
    fn test_exact_split_mismatch_is_rejected() {
        let people = ids(3);
        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(3333)),
            ShareInput::exact(people[1], Money::from_cents(3333)),
            ShareInput::exact(people[2], Money::from_cents(3333)),
        ];

        let err = compute_shares(Money::from_cents(10_000), SplitMode::Exact, &inputs).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("$99.99"));
    }

    #[test]
    fn test_exact_split_missing_amount_counts_as_zero() {
        let people = ids(2);
        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(10_000)),
            ShareInput::equal(people[1]),
        ];

        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Exact, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![10_000, 0]);
    }

    #[test]
    fn test_exact_split_negative_rejected() {
        let people = ids(2);
        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(11_000)),
            ShareInput::exact(people[1], Money::from_cents(-1_000)),
        ];

        let err = compute_shares(Money::from_cents(10_000), SplitMode::Exact, &inputs).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_percent_split() {
        let people = ids(3);
        let inputs = vec![
            ShareInput::percent(people[0], Percent::from_whole(50)),
            ShareInput::percent(people[1], Percent::from_whole(30)),
            ShareInput::percent(people[2], Percent::from_whole(20)),
        ];

        let shares =
            compute_shares(Money::from_cents(10_000), SplitMode::Percent, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![5000, 3000, 2000]);
        assert_eq!(shares[1].percent, Some(Percent::from_whole(30)));
    }

    #[test]
    fn test_percent_split_rounding_drift_absorbed() {
        let people = ids(3);
        let inputs = vec![
            ShareInput::percent(people[0], Percent::from_hundredths(3333)),
            ShareInput::percent(people[1], Percent::from_hundredths(3333)),
            ShareInput::percent(people[2], Percent::from_hundredths(3334)),
        ];

        // 10.01 * 33.33% = 3.336.. -> 3.34, twice; 10.01 - 6.68 = 3.33
        let total = Money::from_cents(1001);
        let shares = compute_shares(total, SplitMode::Percent, &inputs).unwrap();
        assert_eq!(amounts(&shares), vec![334, 334, 333]);
        assert_eq!(sum(&shares), total);
    }

    #[test]
    fn test_percent_split_must_total_100() {
        let people = ids(2);
        let inputs = vec![
            ShareInput::percent(people[0], Percent::from_whole(50)),
            ShareInput::percent(people[1], Percent::from_hundredths(4999)),
        ];

        let err =
            compute_shares(Money::from_cents(10_000), SplitMode::Percent, &inputs).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("99.99%"));
    }

    #[test]
    fn test_overflowing_inputs_are_rejected() {
        let people = ids(2);
        let huge = Percent::from_hundredths(9_000_000_000_000_000_000);
        let inputs = vec![
            ShareInput::percent(people[0], huge),
            ShareInput::percent(people[1], huge),
        ];
        let err = compute_shares(Money::from_cents(100), SplitMode::Percent, &inputs).unwrap_err();
        assert!(err.is_validation());

        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(i64::MAX)),
            ShareInput::exact(people[1], Money::from_cents(1)),
        ];
        let err = compute_shares(Money::from_cents(100), SplitMode::Exact, &inputs).unwrap_err();
        assert!(err.is_validation());

        // rounding i64::MAX / 2 up leaves a sum above i64::MAX
        let err = compute_shares(
            Money::from_cents(i64::MAX),
            SplitMode::Equal,
            &[ShareInput::equal(people[0]), ShareInput::equal(people[1])],
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_duplicate_inputs_collapse() {
        let people = ids(2);
        let inputs = vec![
            ShareInput::exact(people[0], Money::from_cents(1000)),
            ShareInput::exact(people[1], Money::from_cents(5000)),
            ShareInput::exact(people[0], Money::from_cents(5000)),
        ];

        let shares = compute_shares(Money::from_cents(10_000), SplitMode::Exact, &inputs).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].participant_id, people[0]);
        assert_eq!(amounts(&shares), vec![5000, 5000]);
    }

    #[test]
    fn test_no_participants_rejected() {
        for mode in [SplitMode::Equal, SplitMode::Exact, SplitMode::Percent] {
            let err = compute_shares(Money::from_cents(100), mode, &[]).unwrap_err();
            assert!(err.is_validation());
        }
    }
}
