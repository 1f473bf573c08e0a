use serde::Serialize;

use pizzeria_cart::Cart;
use pizzeria_core::{Category, DomainError, DomainResult, ItemId, Money};

/// Fixed sales tax: 10% expressed in basis points.
pub const TAX_RATE_BPS: u32 = 1_000;

/// Invoice line derived from a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    pub item_id: ItemId,
    pub category: Category,
    pub label: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

/// Derived billing summary of a cart and a tendered amount. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    lines: Vec<InvoiceLine>,
    subtotal: Money,
    tax_rate_bps: u32,
    tax: Money,
    total: Money,
    amount_paid: Money,
    balance: Money,
}

impl Invoice {
    /// Compute the invoice for `cart` with `amount_paid` tendered.
    ///
    /// `amount_paid` is not validated: a negative amount simply yields a larger
    /// negative balance. Fails only on arithmetic overflow.
    pub fn compute(cart: &Cart, amount_paid: Money) -> DomainResult<Self> {
        let overflow = |what: &str| DomainError::invariant(format!("invoice {what} overflow"));

        let mut lines = Vec::with_capacity(cart.len());
        let mut subtotal = Money::ZERO;
        for line in cart.lines() {
            let line_total = line.line_total().ok_or_else(|| overflow("line amount"))?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or_else(|| overflow("subtotal"))?;
            lines.push(InvoiceLine {
                item_id: line.item_id(),
                category: line.category(),
                label: line.label(),
                unit_price: line.price(),
                quantity: line.quantity(),
                line_total,
            });
        }

        let tax = subtotal
            .checked_apply_bps(TAX_RATE_BPS)
            .ok_or_else(|| overflow("tax"))?;
        let total = subtotal.checked_add(tax).ok_or_else(|| overflow("total"))?;
        let balance = amount_paid
            .checked_sub(total)
            .ok_or_else(|| overflow("balance"))?;

        Ok(Self {
            lines,
            subtotal,
            tax_rate_bps: TAX_RATE_BPS,
            tax,
            total,
            amount_paid,
            balance,
        })
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_rate_bps(&self) -> u32 {
        self.tax_rate_bps
    }

    /// Tax rate label, e.g. `10%`.
    pub fn tax_rate_label(&self) -> String {
        let whole = self.tax_rate_bps / 100;
        let frac = self.tax_rate_bps % 100;
        if frac == 0 {
            format!("{whole}%")
        } else {
            format!("{whole}.{frac:02}%")
        }
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    /// `amount_paid - total`; negative while underpaid.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Whether the tendered amount covers the total.
    pub fn is_paid(&self) -> bool {
        self.amount_paid >= self.total
    }
}

/// Free-function form of [`Invoice::compute`].
pub fn compute_invoice(cart: &Cart, amount_paid: Money) -> DomainResult<Invoice> {
    Invoice::compute(cart, amount_paid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_cart::Selection;
    use pizzeria_catalog::CatalogItem;

    fn scenario_cart() -> Cart {
        Cart::new().merge(&[
            Selection::new(
                CatalogItem::new(1, "Margherita", Money::from_major(1200)).with_size("Large"),
                Category::Pizza,
                2,
            ),
            Selection::new(
                CatalogItem::new(2, "Cola", Money::from_major(250)),
                Category::Beverage,
                3,
            ),
        ])
    }

    #[test]
    fn exact_payment_settles_the_invoice() {
        let invoice = compute_invoice(&scenario_cart(), Money::from_major(3465)).unwrap();

        assert_eq!(invoice.subtotal(), Money::from_major(3150));
        assert_eq!(invoice.tax(), Money::from_major(315));
        assert_eq!(invoice.total(), Money::from_major(3465));
        assert_eq!(invoice.balance(), Money::ZERO);
        assert!(invoice.is_paid());
    }

    #[test]
    fn short_payment_leaves_negative_balance() {
        let invoice = compute_invoice(&scenario_cart(), Money::from_major(3000)).unwrap();

        assert_eq!(invoice.balance(), Money::from_major(-465));
        assert!(!invoice.is_paid());
    }

    #[test]
    fn negative_tender_is_not_validated_here() {
        let invoice = compute_invoice(&scenario_cart(), Money::from_major(-10)).unwrap();
        assert_eq!(invoice.balance(), Money::from_major(-3475));
        assert!(!invoice.is_paid());
    }

    #[test]
    fn empty_cart_is_zero_and_trivially_paid() {
        let invoice = compute_invoice(&Cart::new(), Money::ZERO).unwrap();
        assert!(invoice.is_empty());
        assert_eq!(invoice.total(), Money::ZERO);
        assert!(invoice.is_paid());
    }

    #[test]
    fn repeated_fractional_prices_do_not_drift() {
        let mut cart = Cart::new();
        for _ in 0..7 {
            cart.merge_in_place(&[
                Selection::new(CatalogItem::new(1, "A", Money::from_minor(33_333)), Category::Pizza, 1),
                Selection::new(CatalogItem::new(2, "B", Money::from_minor(33_333)), Category::Topping, 1),
                Selection::new(CatalogItem::new(3, "C", Money::from_minor(33_333)), Category::Beverage, 1),
            ]);
        }

        let invoice = compute_invoice(&cart, Money::ZERO).unwrap();
        // 3 items × 7 × 333.33 = 6999.93
        assert_eq!(invoice.subtotal(), Money::from_minor(699_993));
        assert_eq!(invoice.lines()[0].line_total, Money::from_minor(233_331));
        // 699.993 rounds to 699.99
        assert_eq!(invoice.tax(), Money::from_minor(69_999));
        assert_eq!(invoice.total(), Money::from_minor(769_992));
    }

    #[test]
    fn lines_carry_labels_and_totals() {
        let invoice = compute_invoice(&scenario_cart(), Money::ZERO).unwrap();
        assert_eq!(invoice.lines()[0].label, "Margherita (Large)");
        assert_eq!(invoice.lines()[0].line_total, Money::from_major(2400));
        assert_eq!(invoice.lines()[1].label, "Cola");
        assert_eq!(invoice.tax_rate_label(), "10%");
    }

    #[test]
    fn overflow_is_an_invariant_error() {
        let cart = Cart::new().merge(&[Selection::new(
            CatalogItem::new(1, "Gold", Money::from_minor(i64::MAX / 2)),
            Category::Pizza,
            3,
        )]);
        let err = compute_invoice(&cart, Money::ZERO).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn cart_strategy() -> impl Strategy<Value = Cart> {
            prop::collection::vec((1u64..20, 0usize..3, 0i64..500_000, 1i64..11), 0..15).prop_map(
                |picks| {
                    let selections: Vec<Selection> = picks
                        .into_iter()
                        .map(|(id, cat, price, qty)| {
                            Selection::new(
                                CatalogItem::new(id, format!("item {id}"), Money::from_minor(price)),
                                Category::ALL[cat],
                                qty,
                            )
                        })
                        .collect();
                    Cart::new().merge(&selections)
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: equal inputs give equal invoices.
            #[test]
            fn compute_is_deterministic(cart in cart_strategy(), paid in -1_000_000i64..10_000_000) {
                let paid = Money::from_minor(paid);
                prop_assert_eq!(compute_invoice(&cart, paid).unwrap(), compute_invoice(&cart, paid).unwrap());
            }

            /// Property: subtotal is the exact sum of price × quantity and the
            /// totals are consistent with each other.
            #[test]
            fn arithmetic_is_exact(cart in cart_strategy(), paid in 0i64..10_000_000) {
                let paid = Money::from_minor(paid);
                let invoice = compute_invoice(&cart, paid).unwrap();

                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.price().minor() * i64::from(l.quantity()))
                    .sum();
                prop_assert_eq!(invoice.subtotal().minor(), expected);

                // tax within half a cent of exactly 10%
                let diff = invoice.tax().minor() * 10 - expected;
                prop_assert!((-5..=5).contains(&diff));

                prop_assert_eq!(invoice.total().minor(), invoice.subtotal().minor() + invoice.tax().minor());
                prop_assert_eq!(invoice.balance().minor(), paid.minor() - invoice.total().minor());
                prop_assert_eq!(invoice.is_paid(), paid >= invoice.total());
            }
        }
    }
}
