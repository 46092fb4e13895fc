//! Keyword rules - substring terms mapped to categories
//!
//! Terms are matched against the lower-cased item name in table order and
//! the first hit wins. Each term appears exactly once; `paprika` is a spice
//! here, not a vegetable (sweet peppers are matched by `bell pepper`).

use super::{
    BAKERY, BAKING, BEVERAGES, CANNED_GOODS, DAIRY, FRUITS, GRAINS, MEATS, PASTA, SNACKS, SPICES,
    VEGETABLES,
};

/// Canned and preserved indicators, checked before the general table
///
/// "tomato puree" is canned goods even though "tomato" is a vegetable.
pub const PRESERVED_TERMS: &[&str] = &["canned", "puree", "compote", "pickled"];

/// General keyword table, in precedence order
pub const KEYWORDS: &[(&str, &str)] = &[
    // Dairy
    ("milk", DAIRY),
    ("butter", DAIRY),
    ("cheese", DAIRY),
    ("yogurt", DAIRY),
    ("yoghurt", DAIRY),
    ("sour cream", DAIRY),
    ("cream", DAIRY),
    ("curd", DAIRY),
    // Bakery
    ("bread", BAKERY),
    ("baguette", BAKERY),
    ("croissant", BAKERY),
    ("bagel", BAKERY),
    ("brioche", BAKERY),
    // Fruits
    ("apple", FRUITS),
    ("pear", FRUITS),
    ("banana", FRUITS),
    ("orange", FRUITS),
    ("lemon", FRUITS),
    ("grape", FRUITS),
    ("berry", FRUITS),
    ("peach", FRUITS),
    ("plum", FRUITS),
    // Vegetables
    ("carrot", VEGETABLES),
    ("potato", VEGETABLES),
    ("onion", VEGETABLES),
    ("tomato", VEGETABLES),
    ("bell pepper", VEGETABLES),
    ("cucumber", VEGETABLES),
    ("garlic", VEGETABLES),
    ("cabbage", VEGETABLES),
    ("lettuce", VEGETABLES),
    ("spinach", VEGETABLES),
    ("zucchini", VEGETABLES),
    ("broccoli", VEGETABLES),
    // Meats
    ("chicken", MEATS),
    ("pork", MEATS),
    ("beef", MEATS),
    ("turkey", MEATS),
    ("lamb", MEATS),
    ("sausage", MEATS),
    ("salami", MEATS),
    ("bacon", MEATS),
    ("prosciutto", MEATS),
    ("mince", MEATS),
    ("meat", MEATS),
    // Pasta
    ("pasta", PASTA),
    ("spaghetti", PASTA),
    ("penne", PASTA),
    ("macaroni", PASTA),
    ("fusilli", PASTA),
    ("noodle", PASTA),
    ("lasagne", PASTA),
    ("tagliatelle", PASTA),
    // Grains and legumes
    ("rice", GRAINS),
    ("couscous", GRAINS),
    ("bulgur", GRAINS),
    ("millet", GRAINS),
    ("buckwheat", GRAINS),
    ("quinoa", GRAINS),
    ("oat", GRAINS),
    ("muesli", GRAINS),
    ("flakes", GRAINS),
    ("semolina", GRAINS),
    ("lentil", GRAINS),
    ("bean", GRAINS),
    // Baking
    ("flour", BAKING),
    ("sugar", BAKING),
    ("yeast", BAKING),
    ("baking powder", BAKING),
    // Spices
    ("salt", SPICES),
    ("pepper", SPICES),
    ("paprika", SPICES),
    ("cinnamon", SPICES),
    ("oregano", SPICES),
    ("basil", SPICES),
    ("spice", SPICES),
    ("herb", SPICES),
    // Beverages
    ("water", BEVERAGES),
    ("juice", BEVERAGES),
    ("soda", BEVERAGES),
    ("beer", BEVERAGES),
    ("wine", BEVERAGES),
    ("coffee", BEVERAGES),
    // Snacks
    ("chips", SNACKS),
    ("crisps", SNACKS),
    ("cookie", SNACKS),
    ("biscuit", SNACKS),
    ("chocolate", SNACKS),
    ("snack", SNACKS),
    ("popcorn", SNACKS),
    ("wafer", SNACKS),
    ("candy", SNACKS),
];

/// Category for a lower-cased item name, if any term matches
pub fn category_for_name(lowercase_name: &str) -> Option<&'static str> {
    if PRESERVED_TERMS
        .iter()
        .any(|term| lowercase_name.contains(term))
    {
        return Some(CANNED_GOODS);
    }

    KEYWORDS
        .iter()
        .find(|(term, _)| lowercase_name.contains(term))
        .map(|(_, category)| *category)
}
