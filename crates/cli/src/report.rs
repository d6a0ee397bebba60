//! Plain-text formatting for the non-interactive commands.

use std::fmt::Write as _;

use storefront_core::CartUpdate;
use storefront_protocol::{CartSummary, DepthFrame, ProductCard, ProductDetail};

pub fn cards(cards: &[ProductCard]) -> String {
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:<10} {:<17} {:>9}",
            card.id, card.title, card.category, card.tier_label, card.price_label
        );
        for spec in &card.specs {
            let _ = writeln!(out, "         - {spec}");
        }
        if let Some(comment) = &card.eng_comment {
            let _ = writeln!(out, "         // ENG: {comment}");
        }
    }
    out
}

pub fn detail(detail: &ProductDetail) -> String {
    let mut out = cards(std::slice::from_ref(&detail.card));
    if detail.variants.is_empty() {
        out.push_str("         (no variants)\n");
    } else {
        let _ = writeln!(out, "         variants: {}", detail.variants.join(", "));
    }
    out
}

pub fn depth_frame(frame: &DepthFrame) -> String {
    let mut out = format!("scroll {:.1}\n", frame.world.translate_z);
    for layer in &frame.layers {
        let _ = writeln!(
            out,
            "  layer {:>2}  depth {:>9.1}  opacity {:.3}  blur {:>6.2}  {}",
            layer.index,
            layer.depth,
            layer.opacity,
            layer.blur,
            if layer.interactive { "clickable" } else { "passed" }
        );
    }
    out
}

pub fn cart(summary: &CartSummary) -> String {
    if summary.item_count == 0 {
        return "cart is empty\n".to_string();
    }
    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "[{}] {:<28} {:<9} x{:<2} {:>9}",
            line.index, line.title, line.variant, line.quantity, line.line_total
        );
    }
    let listed: u32 = summary.lines.iter().map(|l| l.quantity).sum();
    if listed < summary.item_count {
        let _ = writeln!(
            out,
            "({} item(s) reference products no longer in the catalog)",
            summary.item_count - listed
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), total {}",
        summary.item_count, summary.total_label
    );
    out
}

pub fn update(update: &CartUpdate) -> String {
    let mut out = format!("cart now holds {} item(s)\n", update.item_count);
    if update.capped {
        out.push_str("quantity capped at the per-line maximum\n");
    }
    if let Some(notice) = &update.notice {
        let _ = writeln!(out, "warning: {notice}");
    }
    out
}
