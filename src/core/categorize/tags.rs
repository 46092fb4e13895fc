//! Catalog tag rules - map remote category tags to local categories

use super::{
    BAKERY, BEVERAGES, CANNED_GOODS, DAIRY, FRUITS, GRAINS, MEATS, PASTA, SNACKS, SPICES,
    VEGETABLES,
};

/// Exact tag matches
const TAG_TABLE: &[(&str, &str)] = &[
    ("en:dairies", DAIRY),
    ("en:cheeses", DAIRY),
    ("en:milks", DAIRY),
    ("en:yogurts", DAIRY),
    ("en:meats", MEATS),
    ("en:poultries", MEATS),
    ("en:fishes", MEATS),
    ("en:seafood", MEATS),
    ("en:fresh-vegetables", VEGETABLES),
    ("en:vegetables", VEGETABLES),
    ("en:fruits", FRUITS),
    ("en:fresh-fruits", FRUITS),
    ("en:beverages", BEVERAGES),
    ("en:carbonated-drinks", BEVERAGES),
    ("en:fruit-juices", BEVERAGES),
    ("en:breads", BAKERY),
    ("en:sandwiches", BAKERY),
    ("en:biscuits", SNACKS),
    ("en:snacks", SNACKS),
    ("en:salty-snacks", SNACKS),
    ("en:sweet-snacks", SNACKS),
    ("en:canned-foods", CANNED_GOODS),
    ("en:condiments", SPICES),
    ("en:spices", SPICES),
    ("en:sauces", SPICES),
    ("en:pastas", PASTA),
    ("en:cereals", GRAINS),
    ("en:grains", GRAINS),
    ("en:legumes", GRAINS),
    ("en:rice", GRAINS),
];

/// Tag families, checked in priority order when no exact match exists
fn family_for_tag(tag: &str) -> Option<&'static str> {
    let has = |needle: &str| tag.contains(needle);

    if has("dairy") || has("cheese") || has("yogurt") || has("milk") {
        return Some(DAIRY);
    }
    if has("meat")
        || has("ham")
        || has("sausage")
        || has("poultry")
        || has("fish")
        || has("seafood")
    {
        return Some(MEATS);
    }
    if has("bread") || has("biscuit") || has("sandwich") {
        return Some(BAKERY);
    }
    if has("fruit") && !has("fruit-juices") {
        return Some(FRUITS);
    }
    if has("vegetables") {
        return Some(VEGETABLES);
    }
    if has("beverages") || has("drinks") || has("juices") || has("water") {
        return Some(BEVERAGES);
    }
    if has("pasta") {
        return Some(PASTA);
    }
    if has("cereal") || has("rice") || has("grain") || has("legume") {
        return Some(GRAINS);
    }
    None
}

/// Category for a product's tag list; the first tag that maps wins
pub fn category_for_tags<S: AsRef<str>>(tags: &[S]) -> Option<&'static str> {
    tags.iter().find_map(|tag| {
        let tag = tag.as_ref();
        TAG_TABLE
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, category)| *category)
            .or_else(|| family_for_tag(tag))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tag() {
        assert_eq!(category_for_tags(&["en:canned-foods"]), Some(CANNED_GOODS));
        assert_eq!(category_for_tags(&["en:fruit-juices"]), Some(BEVERAGES));
    }

    #[test]
    fn test_family_heuristics() {
        assert_eq!(category_for_tags(&["en:semi-skimmed-milks"]), Some(DAIRY));
        assert_eq!(category_for_tags(&["en:smoked-hams"]), Some(MEATS));
        assert_eq!(category_for_tags(&["en:dried-fruits"]), Some(FRUITS));
        assert_eq!(category_for_tags(&["en:orange-fruit-juices"]), Some(BEVERAGES));
        assert_eq!(category_for_tags(&["en:durum-wheat-pasta"]), Some(PASTA));
        assert_eq!(category_for_tags(&["en:breakfast-cereals"]), Some(GRAINS));
    }

    #[test]
    fn test_first_mapping_tag_wins() {
        let tags = ["en:plant-based-foods", "en:pastas", "en:cheeses"];
        assert_eq!(category_for_tags(&tags), Some(PASTA));
    }

    #[test]
    fn test_family_priority_within_a_tag() {
        // dairy outranks everything else inside one tag
        assert_eq!(category_for_tags(&["en:milk-chocolate-biscuits"]), Some(DAIRY));
    }

    #[test]
    fn test_no_match() {
        let empty: [&str; 0] = [];
        assert_eq!(category_for_tags(&empty), None);
        assert_eq!(category_for_tags(&["en:plant-based-foods"]), None);
    }
}
