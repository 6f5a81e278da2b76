//! Static recycling tips shown in the tips view

use serde::Serialize;

/// One tips article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TipArticle {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
    pub content: &'static str,
}

pub const TIPS: &[TipArticle] = &[
    TipArticle {
        id: "1",
        title: "Effective Recycling Strategies",
        category: "Recycling 101",
        summary: "Learn the golden rules of recycling to avoid contamination.",
        content: "Rinse before you bin! Food residue is the #1 contaminant. Separate caps from bottles if required by your local facility. Flatten cardboard boxes to save space.",
    },
    TipArticle {
        id: "2",
        title: "Upcycling Household Jars",
        category: "DIY & Upcycling",
        summary: "Turn old glass jars into beautiful storage or decor.",
        content: "Glass jars are infinitely recyclable, but they are also great for storage. Clean them out, paint the lids, and use them for spices, screws, or as rustic flower vases.",
    },
    TipArticle {
        id: "3",
        title: "The Truth About Plastics",
        category: "Impact",
        summary: "Understanding the numbers on plastic containers.",
        content: "Not all plastics are created equal. #1 (PET) and #2 (HDPE) are widely recyclable. #3 through #7 are often harder to process. Always check your local guidelines.",
    },
    TipArticle {
        id: "4",
        title: "Composting Basics",
        category: "Organic",
        summary: "How to start a compost bin in your apartment.",
        content: "You don't need a garden to compost! Vermicomposting (worm bins) or Bokashi buckets work great in small spaces to turn scraps into nutrient-rich soil.",
    },
];

pub fn find_tip(id: &str) -> Option<&'static TipArticle> {
    TIPS.iter().find(|tip| tip.id == id.trim())
}
