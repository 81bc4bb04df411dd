use super::*;
use crate::param::ParamList;

const PRODUCTS: &str = "SELECT * FROM products WHERE is_active = true";

/// Every `$n` in `sql`, in order of appearance.
fn placeholders(sql: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut rest = sql;
    while let Some(pos) = rest.find('$') {
        let digits: String = rest[pos + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(n) = digits.parse() {
            out.push(n);
        }
        rest = &rest[pos + 1..];
    }
    out
}

#[test]
fn base_without_conditions_is_unchanged() {
    let stmt = FilterQuery::new(PRODUCTS).build();
    assert_eq!(stmt.sql(), PRODUCTS);
    assert!(stmt.params().is_empty());
}

#[test]
fn optional_category_filter_starts_at_one() {
    let mut q = FilterQuery::new(PRODUCTS);
    q.and_where_opt("category_id = $?", "7".to_string());
    let stmt = q.build();

    assert!(stmt.sql().ends_with(" AND category_id = $1"));
    assert_eq!(stmt.params().debug_values(), vec!["\"7\""]);
}

#[test]
fn two_markers_bind_the_same_value_twice() {
    let mut q = FilterQuery::new("SELECT * FROM t WHERE 1=1");
    q.and_where("(a = $? OR b = $?)", "v".to_string());
    let stmt = q.build();

    assert_eq!(stmt.sql(), "SELECT * FROM t WHERE 1=1 AND (a = $1 OR b = $2)");
    assert_eq!(stmt.params().debug_values(), vec!["\"v\"", "\"v\""]);
}

#[test]
fn skipped_optionals_leave_no_gaps() {
    let mut q = FilterQuery::new(PRODUCTS);
    q.and_where_opt("sku = $?", String::new());
    q.and_where("(name ILIKE $? OR sku ILIKE $?)", "%bolt%".to_string());
    q.and_where_opt("category_id = $?", None::<i32>);
    q.and_where_opt("brand = $?", "   ".to_string());
    q.and_where_opt("warehouse_id = $?", 0_i32);
    q.and_where_opt("model = $?", Some("X1".to_string()));
    let stmt = q.build();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM products WHERE is_active = true \
         AND (name ILIKE $1 OR sku ILIKE $2) AND model = $3"
    );
    assert_eq!(placeholders(stmt.sql()), vec![1, 2, 3]);
    assert_eq!(stmt.params().len(), 3);
}

#[test]
fn blank_optional_is_same_as_never_calling() {
    let mut with_blanks = FilterQuery::new(PRODUCTS);
    with_blanks.and_where_opt("category_id = $?", 3_i32);
    for _ in 0..5 {
        with_blanks.and_where_opt("name = $?", String::new());
    }
    with_blanks.and_where_opt("sku = $?", "A-1".to_string());

    let mut without = FilterQuery::new(PRODUCTS);
    without.and_where_opt("category_id = $?", 3_i32);
    without.and_where_opt("sku = $?", "A-1".to_string());

    let (a_sql, a_params) = with_blanks.build().into_parts();
    let (b_sql, b_params) = without.build().into_parts();
    assert_eq!(a_sql, b_sql);
    assert_eq!(a_params.debug_values(), b_params.debug_values());
}

#[test]
fn zero_marker_condition_consumes_no_index() {
    let mut q = FilterQuery::new("SELECT * FROM stock_levels WHERE 1=1");
    q.and_where("quantity_on_hand > 0", true);
    q.and_where_opt("product_id = $?", 4_i32);
    let stmt = q.build();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM stock_levels WHERE 1=1 AND quantity_on_hand > 0 AND product_id = $1"
    );
    assert_eq!(stmt.params().len(), 1);
}

#[test]
fn numbering_continues_after_base_placeholders() {
    let mut args = ParamList::new();
    args.push(9_i32);
    let mut q = FilterQuery::with_args("SELECT * FROM stock_levels WHERE warehouse_id = $1", args);
    assert_eq!(q.next_index(), 2);
    q.and_where_opt("product_id = $?", 4_i32);
    let stmt = q.build();

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM stock_levels WHERE warehouse_id = $1 AND product_id = $2"
    );
    assert_eq!(stmt.params().debug_values(), vec!["9", "4"]);
}

#[test]
fn parity_holds_for_mixed_sequences() {
    let values = ["", "a", "q", "b", " ", "c"];
    let mut q = FilterQuery::new("SELECT * FROM t WHERE 1=1");
    for (i, v) in values.iter().enumerate() {
        if i % 2 == 0 {
            q.and_where_opt("(x = $? OR y = $?)", v.to_string());
        } else {
            q.and_where_opt("z = $?", v.to_string());
        }
    }
    assert_eq!(q.condition_count(), 4);
    let stmt = q.build();
    let found = placeholders(stmt.sql());
    assert_eq!(found, vec![1, 2, 3, 4, 5]);
    assert_eq!(found.len(), stmt.params().len());
}

#[test]
fn statement_suffix_continues_numbering() {
    let mut q = FilterQuery::new(PRODUCTS);
    q.and_where_opt("category_id = $?", 2_i32);
    let mut stmt = q.build();
    stmt.push(" ORDER BY name").limit_offset(50, 100);

    assert_eq!(
        stmt.sql(),
        "SELECT * FROM products WHERE is_active = true AND category_id = $1 \
         ORDER BY name LIMIT $2 OFFSET $3"
    );
    assert_eq!(stmt.params().debug_values(), vec!["2", "50", "100"]);
}

#[test]
fn fixed_statement_binds_in_order() {
    let stmt = Statement::new("SELECT * FROM products WHERE id = $1").bind(5_i32);
    assert_eq!(stmt.params().len(), 1);
    assert_eq!(stmt.sql(), "SELECT * FROM products WHERE id = $1");
}

#[test]
fn max_placeholder_scans_multi_digit() {
    assert_eq!(max_placeholder("SELECT 1"), 0);
    assert_eq!(max_placeholder("a = $2 AND b = $12 AND c = $3"), 12);
    assert_eq!(max_placeholder("price > $"), 0);
}

#[test]
fn blank_rules() {
    assert!("".is_blank());
    assert!("  \t".is_blank());
    assert!(!"x".is_blank());
    assert!(None::<String>.is_blank());
    assert!(Some(String::new()).is_blank());
    assert!(!Some(3_i32).is_blank());
    assert!(0_i64.is_blank());
    assert!(rust_decimal::Decimal::ZERO.is_blank());
    assert!(!true.is_blank());
    assert!(!false.is_blank());
    assert!(!Some(false).is_blank());
    assert!(None::<bool>.is_blank());
}

#[test]
fn false_flag_keeps_its_condition() {
    let mut q = FilterQuery::new("SELECT * FROM products WHERE 1=1");
    q.and_where_opt("is_active = $?", false);
    q.and_where_opt("is_active = $?", None::<bool>);
    let stmt = q.build();
    assert_eq!(stmt.sql(), "SELECT * FROM products WHERE 1=1 AND is_active = $1");
    assert_eq!(stmt.params().debug_values(), vec!["false"]);
}
