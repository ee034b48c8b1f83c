//! Static comparison regions and the demo entries that back them.

use crate::model::{Category, NewWasteEntry, PressureLevel, Region};

/// Regions shown on the comparison map, in display order.
#[must_use]
pub fn default_regions() -> Vec<Region> {
    [
        ("RS Puram", 11.0020, 76.9500, PressureLevel::High),
        ("Gandhipuram", 11.0168, 76.9558, PressureLevel::Medium),
        ("Saravanampatti", 11.0600, 77.0300, PressureLevel::Low),
        ("Peelamedu", 11.0220, 77.0270, PressureLevel::Low),
    ]
    .into_iter()
    .map(|(name, lat, lng, level)| Region {
        name: name.to_owned(),
        lat,
        lng,
        level,
    })
    .collect()
}

/// Seed entries for the synthetic users of [`default_regions`].
///
/// Amounts are listed per region as food kg, plastic kg, energy kWh.
#[must_use]
pub fn demo_entries() -> Vec<(Region, NewWasteEntry)> {
    let amounts = [
        [4.8, 2.1, 18.0],
        [3.1, 1.4, 12.0],
        [1.9, 0.6, 9.0],
        [2.3, 0.9, 11.0],
    ];

    default_regions()
        .into_iter()
        .zip(amounts)
        .flat_map(|(region, row)| {
            Category::ALL
                .into_iter()
                .zip(row)
                .map(move |(category, amount)| (region.clone(), NewWasteEntry::new(category, amount)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    #[test]
    fn regions_map_to_demo_users() {
        let users: Vec<UserId> = default_regions().iter().map(Region::user_id).collect();

        assert_eq!(
            users,
            vec![
                UserId::from("demo_rspuram"),
                UserId::from("demo_gandhipuram"),
                UserId::from("demo_saravanampatti"),
                UserId::from("demo_peelamedu"),
            ]
        );
    }

    #[test]
    fn every_region_gets_one_entry_per_category() {
        let entries = demo_entries();

        assert_eq!(entries.len(), 12);
        for region in default_regions() {
            let categories: Vec<Category> = entries
                .iter()
                .filter(|(owner, _)| owner.name == region.name)
                .map(|(_, entry)| entry.category)
                .collect();
            assert_eq!(categories, Category::ALL.to_vec());
        }
    }
}
