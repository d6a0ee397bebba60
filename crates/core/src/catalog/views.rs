use storefront_protocol::{Product, ProductCard, ProductDetail, Tier};

use super::{Catalog, CatalogLookup, TierFilter};

/// Build the grid card for a product.
///
/// Specs and the engineering comment are a signature-tier feature; they are
/// left empty on essentials cards even if the record carries them.
pub fn product_card(product: &Product) -> ProductCard {
    let signature = product.tier == Tier::Signature;
    ProductCard {
        id: product.id.clone(),
        title: product.title.clone(),
        category: product.category.clone(),
        tier: product.tier,
        tier_label: product.tier.label().to_string(),
        tier_class: product.tier.css_class().to_string(),
        price: product.price,
        price_label: product.price.to_string(),
        specs: if signature {
            product.specs.clone()
        } else {
            Vec::new()
        },
        eng_comment: if signature {
            product.eng_comment.clone()
        } else {
            None
        },
    }
}

/// Detail page model; the first variant is preselected.
pub fn product_detail(product: &Product) -> ProductDetail {
    ProductDetail {
        card: product_card(product),
        variants: product.variants.clone(),
        default_variant: product.variants.first().cloned(),
    }
}

impl Catalog {
    /// Grid cards for every product passing `filter`, in catalog order.
    pub fn cards(&self, filter: TierFilter) -> Vec<ProductCard> {
        self.filter(filter).map(product_card).collect()
    }

    pub fn detail(&self, id: &str) -> Option<ProductDetail> {
        self.product(id).map(product_detail)
    }
}
