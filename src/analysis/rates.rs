use super::hero_stats::{HeroRecord, HeroTable};

impl HeroRecord {
    /// Per-match averages and KDA. Unpicked heroes get zeros, not N/A.
    pub fn compute_rates(&mut self) {
        if self.picks == 0 {
            self.avg_kills = 0.0;
            self.avg_deaths = 0.0;
            self.avg_assists = 0.0;
            self.avg_gpm = 0.0;
            self.kda_ratio = 0.0;
            return;
        }

        let picks = self.picks as f64;
        self.avg_kills = self.total_kills as f64 / picks;
        self.avg_deaths = self.total_deaths as f64 / picks;
        self.avg_assists = self.total_assists as f64 / picks;
        self.avg_gpm = self.total_gpm / picks;
        self.kda_ratio = kda_ratio(self.total_kills, self.total_deaths, self.total_assists);
    }
}

pub fn kda_ratio(kills: u64, deaths: u64, assists: u64) -> f64 {
    (kills + assists) as f64 / deaths.max(1) as f64
}

pub fn apply_rates(records: &mut HeroTable) {
    for record in records.values_mut() {
        record.compute_rates();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_match_example() {
        let mut record = HeroRecord::new("Anti-Mage".to_string());
        record.picks = 2;
        record.wins = 1;
        record.total_kills = 14;
        record.total_deaths = 8;
        record.total_assists = 8;
        record.total_gpm = 1100.0;
        record.compute_rates();

        assert_eq!(record.avg_kills, 7.0);
        assert_eq!(record.avg_deaths, 4.0);
        assert_eq!(record.avg_assists, 4.0);
        assert_eq!(record.avg_gpm, 550.0);
        assert_eq!(record.kda_ratio, 2.75);
    }

    #[test]
    fn deathless_kda_divides_by_one() {
        assert_eq!(kda_ratio(5, 0, 7), 12.0);
    }

    #[test]
    fn unpicked_hero_is_all_zero() {
        let mut record = HeroRecord::new("Bench".to_string());
        record.avg_kills = 3.0;
        record.kda_ratio = 1.5;
        record.compute_rates();
        assert_eq!(record.avg_kills, 0.0);
        assert_eq!(record.avg_deaths, 0.0);
        assert_eq!(record.avg_assists, 0.0);
        assert_eq!(record.avg_gpm, 0.0);
        assert_eq!(record.kda_ratio, 0.0);
    }

    proptest! {
        #[test]
        fn averages_match_totals(
            picks in 1u32..500,
            kills in 0u64..10_000,
            deaths in 0u64..10_000,
            assists in 0u64..10_000,
        ) {
            let mut record = HeroRecord::new("Any".to_string());
            record.picks = picks;
            record.total_kills = kills;
            record.total_deaths = deaths;
            record.total_assists = assists;
            record.compute_rates();

            prop_assert!((record.avg_kills - kills as f64 / picks as f64).abs() < 1e-9);
            let expected = (kills + assists) as f64 / deaths.max(1) as f64;
            prop_assert!((record.kda_ratio - expected).abs() < 1e-9);
        }
    }
}
