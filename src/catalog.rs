//! Curated lookup tables backing account inference, payee canonicalization
//! and classification. Immutable, supplied at construction so tests can
//! substitute fixtures.

/// Card-purchase merchant tier: any keyword hit maps to the given
/// category/subcategory at the tier's confidence.
pub struct MerchantGroup {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub subcategory: &'static str,
    pub confidence: f64,
}

pub struct Catalog {
    /// Account code embedded in export filenames → friendly account name.
    pub account_codes: &'static [(&'static str, &'static str)],
    /// Uppercased needle → canonical merchant name. Checked exact first,
    /// then by substring containment in either direction.
    pub aliases: &'static [(&'static str, &'static str)],
    /// Category → known payees; a payee hit here classifies at 1.0.
    pub known_payees: &'static [(&'static str, &'static [&'static str])],
    /// Payee → subcategory, overriding the category's first subcategory.
    pub subcategory_overrides: &'static [(&'static str, &'static str)],
    /// Category → its subcategories, first entry is the default.
    pub subcategories: &'static [(&'static str, &'static [&'static str])],
    /// Category → scoring keywords for the keyword-scoring stage.
    pub category_keywords: &'static [(&'static str, &'static [&'static str])],
    /// Subcategory → co-occurrence keywords for the scoring bonus.
    pub subcategory_keywords: &'static [(&'static str, &'static [&'static str])],
    /// Card-purchase merchant tiers, most specific first.
    pub merchant_groups: &'static [MerchantGroup],
    pub payroll_keywords: &'static [&'static str],
    pub insurer_keywords: &'static [&'static str],
    pub utility_keywords: &'static [&'static str],
    /// Merchant-suffix heuristics for the payee extractor.
    pub entity_suffixes: &'static [&'static str],
    pub institution_keywords: &'static [&'static str],
    pub storefront_keywords: &'static [&'static str],
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            account_codes: ACCOUNT_CODES,
            aliases: ALIASES,
            known_payees: KNOWN_PAYEES,
            subcategory_overrides: SUBCATEGORY_OVERRIDES,
            subcategories: SUBCATEGORIES,
            category_keywords: CATEGORY_KEYWORDS,
            subcategory_keywords: SUBCATEGORY_KEYWORDS,
            merchant_groups: MERCHANT_GROUPS,
            payroll_keywords: PAYROLL_KEYWORDS,
            insurer_keywords: INSURER_KEYWORDS,
            utility_keywords: UTILITY_KEYWORDS,
            entity_suffixes: ENTITY_SUFFIXES,
            institution_keywords: INSTITUTION_KEYWORDS,
            storefront_keywords: STOREFRONT_KEYWORDS,
        }
    }
}

impl Catalog {
    pub fn account_name_for_code(&self, code: &str) -> Option<&'static str> {
        self.account_codes
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// First subcategory listed for a category, used as its default.
    pub fn default_subcategory(&self, category: &str) -> Option<&'static str> {
        self.subcategories
            .iter()
            .find(|(c, _)| *c == category)
            .and_then(|(_, subs)| subs.first().copied())
    }

    pub fn subcategories_of(&self, category: &str) -> &'static [&'static str] {
        self.subcategories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, subs)| *subs)
            .unwrap_or(&[])
    }

    pub fn subcategory_override(&self, payee: &str) -> Option<&'static str> {
        self.subcategory_overrides
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(payee))
            .map(|(_, s)| *s)
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

const ACCOUNT_CODES: &[(&str, &str)] = &[
    ("1425", "Primary Checking"),
    ("2209", "Rewards Card"),
    ("5512", "Joint Savings"),
    ("7731", "Brokerage"),
    ("8804", "Retirement"),
];

const ALIASES: &[(&str, &str)] = &[
    ("MCDONALD", "McDonald's"),
    ("STARBUCKS", "Starbucks"),
    ("DUNKIN", "Dunkin'"),
    ("CHICK-FIL-A", "Chick-fil-A"),
    ("CHICKFILA", "Chick-fil-A"),
    ("TACO BELL", "Taco Bell"),
    ("WENDY", "Wendy's"),
    ("CHIPOTLE", "Chipotle"),
    ("STATE FARM", "State Farm"),
    ("GEICO", "Geico"),
    ("PROGRESSIVE", "Progressive"),
    ("ALLSTATE", "Allstate"),
    ("USAA", "USAA"),
    ("WAL-MART", "Walmart"),
    ("WALMART", "Walmart"),
    ("WM SUPERCENTER", "Walmart"),
    ("AMZN", "Amazon"),
    ("AMAZON", "Amazon"),
    ("TARGET", "Target"),
    ("COSTCO", "Costco"),
    ("HOME DEPOT", "Home Depot"),
    ("BEST BUY", "Best Buy"),
    ("CVS", "CVS"),
    ("WALGREENS", "Walgreens"),
    ("RITE AID", "Rite Aid"),
    ("7-ELEVEN", "7-Eleven"),
    ("WAWA", "Wawa"),
    ("SHEETZ", "Sheetz"),
    ("SHELL", "Shell"),
    ("EXXONMOBIL", "Exxon"),
    ("EXXON", "Exxon"),
    ("CHEVRON", "Chevron"),
    ("SUNOCO", "Sunoco"),
    ("UBER", "Uber"),
    ("LYFT", "Lyft"),
    ("NETFLIX", "Netflix"),
    ("SPOTIFY", "Spotify"),
    ("HULU", "Hulu"),
    ("DISNEY", "Disney+"),
    ("VERIZON", "Verizon"),
    ("T-MOBILE", "T-Mobile"),
    ("AT&T", "AT&T"),
    ("COMCAST", "Comcast"),
    ("XFINITY", "Xfinity"),
    ("DOMINION", "Dominion Energy"),
    ("DUKE ENERGY", "Duke Energy"),
    ("KROGER", "Kroger"),
    ("SAFEWAY", "Safeway"),
    ("WEGMANS", "Wegmans"),
    ("TRADER JOE", "Trader Joe's"),
    ("WHOLE FOODS", "Whole Foods"),
    ("HARRIS TEETER", "Harris Teeter"),
    ("FOOD LION", "Food Lion"),
    ("PAYPAL", "PayPal"),
    ("AIRBNB", "Airbnb"),
    ("MARRIOTT", "Marriott"),
    ("HILTON", "Hilton"),
    ("DELTA AIR", "Delta Air Lines"),
    ("UNITED AIR", "United Airlines"),
];

const KNOWN_PAYEES: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &[
            "McDonald's", "Starbucks", "Dunkin'", "Chick-fil-A", "Taco Bell", "Wendy's",
            "Chipotle", "Subway", "Panera Bread", "Five Guys", "Kroger", "Safeway",
            "Wegmans", "Trader Joe's", "Whole Foods", "Harris Teeter", "Food Lion",
        ],
    ),
    (
        "Shopping",
        &["Amazon", "Walmart", "Target", "Costco", "Home Depot", "Best Buy"],
    ),
    (
        "Insurance",
        &["State Farm", "Geico", "Progressive", "Allstate", "USAA"],
    ),
    (
        "Utilities",
        &["Verizon", "T-Mobile", "AT&T", "Comcast", "Xfinity", "Dominion Energy", "Duke Energy"],
    ),
    (
        "Auto & Transport",
        &["Shell", "Exxon", "Chevron", "Sunoco", "Wawa", "Sheetz", "7-Eleven", "Uber", "Lyft"],
    ),
    ("Health", &["CVS", "Walgreens", "Rite Aid"]),
    ("Entertainment", &["Netflix", "Spotify", "Hulu", "Disney+"]),
    (
        "Travel",
        &["Airbnb", "Marriott", "Hilton", "Delta Air Lines", "United Airlines"],
    ),
];

const SUBCATEGORY_OVERRIDES: &[(&str, &str)] = &[
    ("McDonald's", "Fast Food"),
    ("Chick-fil-A", "Fast Food"),
    ("Taco Bell", "Fast Food"),
    ("Wendy's", "Fast Food"),
    ("Five Guys", "Fast Food"),
    ("Subway", "Fast Food"),
    ("Starbucks", "Coffee Shops"),
    ("Dunkin'", "Coffee Shops"),
    ("Kroger", "Groceries"),
    ("Safeway", "Groceries"),
    ("Wegmans", "Groceries"),
    ("Trader Joe's", "Groceries"),
    ("Whole Foods", "Groceries"),
    ("Harris Teeter", "Groceries"),
    ("Food Lion", "Groceries"),
    ("Amazon", "Online"),
    ("Uber", "Rideshare"),
    ("Lyft", "Rideshare"),
    ("Netflix", "Streaming"),
    ("Spotify", "Streaming"),
    ("Hulu", "Streaming"),
    ("Disney+", "Streaming"),
    ("Verizon", "Mobile"),
    ("T-Mobile", "Mobile"),
    ("AT&T", "Mobile"),
    ("Comcast", "Internet"),
    ("Xfinity", "Internet"),
];

const SUBCATEGORIES: &[(&str, &[&str])] = &[
    ("Income", &["Salary", "Other Income"]),
    ("Investment", &["Dividend", "Stock Purchase", "ETF"]),
    ("Banking", &["Transfer", "Fees", "Interest", "ATM"]),
    ("Insurance", &["Auto", "Home"]),
    ("Utilities", &["Electric", "Mobile", "Internet", "Water"]),
    (
        "Food & Dining",
        &["Restaurants", "Fast Food", "Coffee Shops", "Groceries"],
    ),
    ("Shopping", &["General", "Online"]),
    ("Auto & Transport", &["Gas", "Rideshare", "Parking"]),
    ("Health", &["Pharmacy", "Doctor"]),
    ("Entertainment", &["Streaming", "Events"]),
    ("Travel", &["Flights", "Hotels"]),
    ("Miscellaneous", &["Other"]),
];

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &[
            "restaurant", "grill", "pizza", "cafe", "coffee", "burger", "taco", "sushi",
            "deli", "bakery", "diner", "bbq",
        ],
    ),
    (
        "Shopping",
        &["store", "shop", "retail", "outlet", "marketplace", "mall", "amazon", "walmart"],
    ),
    (
        "Auto & Transport",
        &["gas", "fuel", "parking", "toll", "auto", "uber", "lyft", "transit"],
    ),
    (
        "Utilities",
        &["electric", "power", "energy", "water", "internet", "wireless", "cable", "utility"],
    ),
    ("Insurance", &["insurance", "premium", "policy"]),
    (
        "Health",
        &["pharmacy", "medical", "dental", "clinic", "health", "doctor"],
    ),
    (
        "Entertainment",
        &["cinema", "theater", "concert", "streaming", "netflix", "spotify", "tickets"],
    ),
    (
        "Travel",
        &["airline", "hotel", "flight", "travel", "resort", "airbnb"],
    ),
    ("Income", &["payroll", "salary", "wages", "direct dep"]),
    (
        "Banking",
        &["withdrawal", "deposit", "overdraft", "maintenance fee"],
    ),
    (
        "Investment",
        &["dividend", "brokerage", "etf", "shares", "mutual fund"],
    ),
];

const SUBCATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Fast Food", &["drive thru", "drive-thru", "burger", "taco", "fried"]),
    ("Coffee Shops", &["coffee", "espresso", "latte", "roaster"]),
    ("Groceries", &["grocery", "market", "supermarket", "foods"]),
    ("Gas", &["gas", "fuel", "station"]),
    ("Rideshare", &["uber", "lyft", "ride"]),
    ("Streaming", &["streaming", "netflix", "spotify", "hulu"]),
    ("Pharmacy", &["pharmacy", "drug", "rx"]),
    ("Mobile", &["wireless", "mobile", "cellular"]),
    ("Internet", &["internet", "broadband", "cable"]),
    ("Online", &["online", ".com"]),
    ("Flights", &["airline", "air ", "flight"]),
    ("Hotels", &["hotel", "inn", "resort"]),
];

const MERCHANT_GROUPS: &[MerchantGroup] = &[
    MerchantGroup {
        keywords: &[
            "mcdonald", "burger king", "wendy", "taco bell", "chick-fil-a", "chickfila",
            "kfc", "subway", "chipotle", "five guys", "popeyes",
        ],
        category: "Food & Dining",
        subcategory: "Fast Food",
        confidence: 0.95,
    },
    MerchantGroup {
        keywords: &["starbucks", "dunkin", "peet", "coffee", "espresso"],
        category: "Food & Dining",
        subcategory: "Coffee Shops",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &[
            "kroger", "safeway", "wegmans", "aldi", "trader joe", "whole foods",
            "food lion", "harris teeter", "giant", "grocery",
        ],
        category: "Food & Dining",
        subcategory: "Groceries",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["shell", "exxon", "chevron", "sunoco", "wawa", "sheetz", "marathon", "bp "],
        category: "Auto & Transport",
        subcategory: "Gas",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["uber", "lyft"],
        category: "Auto & Transport",
        subcategory: "Rideshare",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["cvs", "walgreens", "rite aid", "pharmacy"],
        category: "Health",
        subcategory: "Pharmacy",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["netflix", "spotify", "hulu", "disney", "hbo", "paramount"],
        category: "Entertainment",
        subcategory: "Streaming",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["verizon", "t-mobile", "at&t", "comcast", "xfinity"],
        category: "Utilities",
        subcategory: "Mobile",
        confidence: 0.90,
    },
    MerchantGroup {
        keywords: &["amazon", "walmart", "target", "costco", "best buy", "home depot", "lowes"],
        category: "Shopping",
        subcategory: "General",
        confidence: 0.85,
    },
];

const PAYROLL_KEYWORDS: &[&str] = &[
    "payroll", "salary", "wages", "adp", "gusto", "paychex", "direct dep",
];

const INSURER_KEYWORDS: &[&str] = &[
    "state farm", "geico", "progressive", "allstate", "usaa", "insurance", "sfpp",
];

const UTILITY_KEYWORDS: &[&str] = &[
    "electric", "power", "energy", "water", "utility", "dominion", "duke",
];

const ENTITY_SUFFIXES: &[&str] = &["inc", "llc", "corp", "ltd", "co"];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "bank", "credit union", "insurance", "financial", "mutual", "savings",
];

const STOREFRONT_KEYWORDS: &[&str] = &[
    "store", "shop", "market", "cafe", "restaurant", "pharmacy", "cleaners", "salon",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_code_lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.account_name_for_code("1425"), Some("Primary Checking"));
        assert_eq!(catalog.account_name_for_code("0000"), None);
    }

    #[test]
    fn test_default_subcategory_is_first() {
        let catalog = Catalog::default();
        assert_eq!(catalog.default_subcategory("Food & Dining"), Some("Restaurants"));
        assert_eq!(catalog.default_subcategory("Miscellaneous"), Some("Other"));
        assert_eq!(catalog.default_subcategory("Nope"), None);
    }

    #[test]
    fn test_subcategory_override() {
        let catalog = Catalog::default();
        assert_eq!(catalog.subcategory_override("McDonald's"), Some("Fast Food"));
        assert_eq!(catalog.subcategory_override("mcdonald's"), Some("Fast Food"));
        assert_eq!(catalog.subcategory_override("Panera Bread"), None);
    }

    #[test]
    fn test_every_override_names_a_listed_subcategory() {
        let catalog = Catalog::default();
        let all: Vec<&str> = catalog
            .subcategories
            .iter()
            .flat_map(|(_, subs)| subs.iter().copied())
            .collect();
        for (payee, sub) in catalog.subcategory_overrides {
            assert!(all.contains(sub), "{payee} maps to unknown subcategory {sub}");
        }
    }

    #[test]
    fn test_merchant_group_targets_exist() {
        let catalog = Catalog::default();
        for group in catalog.merchant_groups {
            assert!(
                catalog.subcategories_of(group.category).contains(&group.subcategory),
                "{} / {} not in taxonomy",
                group.category,
                group.subcategory
            );
        }
    }
}
