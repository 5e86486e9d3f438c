use serde::Serialize;

/// Key that means "keep whatever price and rent the caller entered".
pub const CUSTOM_REGION: &str = "custom";

/// Typical market prices for one region, per square metre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub key: &'static str,
    pub name: &'static str,
    pub price_per_sqm: f64,
    pub rent_per_sqm: f64,
}

impl Region {
    const fn new(key: &'static str, name: &'static str, price: f64, rent: f64) -> Self {
        Self {
            key,
            name,
            price_per_sqm: price,
            rent_per_sqm: rent,
        }
    }

    /// Asking price for a flat of `living_area`, rounded to whole currency units.
    pub fn purchase_price_for(&self, living_area: f64) -> f64 {
        (self.price_per_sqm * living_area).round()
    }
}

pub const REGIONS: &[Region] = &[
    Region::new("muenchen", "München", 7_355.0, 19.65),
    Region::new("frankfurt", "Frankfurt", 5_500.0, 18.52),
    Region::new("berlin", "Berlin", 4_500.0, 12.78),
    Region::new("durchschnitt", "Deutschland Durchschnitt", 3_400.0, 11.40),
    Region::new("erfurt", "Erfurt (Thüringen)", 2_100.0, 7.80),
    Region::new("mecklenburg", "Mecklenburg-Vorpommern", 1_650.0, 6.20),
    Region::new("kleinstadt", "Kleinstadt/Ländlich", 2_300.0, 8.50),
    Region::new("frankreich_sued", "Frankreich Süd (Côte d'Azur)", 4_500.0, 12.00),
    Region::new("frankreich_west", "Frankreich West (Atlantik)", 2_400.0, 8.00),
    Region::new("griechenland", "Griechenland", 1_900.0, 6.50),
    Region::new("italien", "Italien (Süd)", 2_600.0, 8.50),
    Region::new("portugal", "Portugal", 2_800.0, 8.00),
    Region::new("spanien", "Spanien", 2_500.0, 7.50),
    Region::new("ungarn", "Ungarn", 1_800.0, 5.50),
    Region::new("thailand", "Thailand", 1_200.0, 4.00),
    Region::new("vietnam", "Vietnam", 800.0, 3.00),
];

pub fn find_region(key: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|region| region.key == key)
}
