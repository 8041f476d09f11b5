// ABOUTME: The shipped Sakila report catalog
// ABOUTME: Query text per SQL dialect, with labels and chart kinds shared across dialects

use super::{Catalog, CatalogError};
use crate::config::DatabaseType;
use crate::models::{ChartKind, QueryDefinition};

pub const AVERAGE_RENTAL_DURATION: &str = "Average Rental Duration";
pub const RENTALS_PER_CUSTOMER: &str = "Num rentals per customer";
pub const SPECIFIED_RENTAL_ACTIVITY: &str = "Specified Rental Activity";
pub const RENTALS_PER_MONTH: &str = "Rentals per Month";
pub const REVENUE_BY_STORE: &str = "Revenue by Store";
pub const FILMS_BY_RATING: &str = "Films by Rating";
pub const RENTALS_BY_CATEGORY: &str = "Rentals by Category";
pub const TOP_FILMS_IN_CATEGORY: &str = "Top Films in Category";

const AVERAGE_RENTAL_DURATION_TSQL: &str = r#"
SELECT TOP 100 CONCAT(c.first_name, ' ', c.last_name) AS full_name,
AVG(CAST(DATEDIFF(DAY, r.rental_date, r.return_date) AS FLOAT)) AS avg_loan_period
FROM rental r
JOIN customer c ON r.customer_id = c.customer_id
GROUP BY c.first_name, c.last_name
ORDER BY avg_loan_period DESC;
"#;

const AVERAGE_RENTAL_DURATION_SQLITE: &str = r#"
SELECT c.first_name || ' ' || c.last_name AS full_name,
AVG(CAST(julianday(r.return_date) - julianday(r.rental_date) AS INTEGER)) AS avg_loan_period
FROM rental r
JOIN customer c ON r.customer_id = c.customer_id
GROUP BY c.first_name, c.last_name
ORDER BY avg_loan_period DESC
LIMIT 100;
"#;

const RENTALS_PER_CUSTOMER_SQL: &str = r#"
SELECT customer_id, COUNT(rental_id) AS num_rentals
FROM rental
GROUP BY customer_id
ORDER BY customer_id;
"#;

const SPECIFIED_RENTAL_ACTIVITY_TSQL: &str = r#"
SELECT DAY(rental_date) AS rental_day, COUNT(*) AS num_rentals
FROM {table}
WHERE DAY(rental_date) = {day}
GROUP BY DAY(rental_date);
"#;

const SPECIFIED_RENTAL_ACTIVITY_SQLITE: &str = r#"
SELECT CAST(strftime('%d', rental_date) AS INTEGER) AS rental_day, COUNT(*) AS num_rentals
FROM {table}
WHERE CAST(strftime('%d', rental_date) AS INTEGER) = {day}
GROUP BY CAST(strftime('%d', rental_date) AS INTEGER);
"#;

const RENTALS_PER_MONTH_TSQL: &str = r#"
SELECT FORMAT(rental_date, 'yyyy-MM') AS rental_month, COUNT(*) AS num_rentals
FROM rental
GROUP BY FORMAT(rental_date, 'yyyy-MM')
ORDER BY rental_month;
"#;

const RENTALS_PER_MONTH_SQLITE: &str = r#"
SELECT strftime('%Y-%m', rental_date) AS rental_month, COUNT(*) AS num_rentals
FROM rental
GROUP BY strftime('%Y-%m', rental_date)
ORDER BY rental_month;
"#;

const REVENUE_BY_STORE_SQL: &str = r#"
SELECT st.store_id, SUM(p.amount) AS revenue
FROM payment p
JOIN staff st ON p.staff_id = st.staff_id
GROUP BY st.store_id
ORDER BY st.store_id;
"#;

const FILMS_BY_RATING_SQL: &str = r#"
SELECT rating, COUNT(*) AS num_films
FROM film
GROUP BY rating
ORDER BY rating;
"#;

const RENTALS_BY_CATEGORY_SQL: &str = r#"
SELECT c.name AS category, COUNT(DISTINCT r.rental_id) AS num_rentals, SUM(p.amount) AS revenue
FROM category c
JOIN film_category fc ON fc.category_id = c.category_id
JOIN inventory i ON i.film_id = fc.film_id
JOIN rental r ON r.inventory_id = i.inventory_id
LEFT JOIN payment p ON p.rental_id = r.rental_id
GROUP BY c.name
ORDER BY c.name;
"#;

const TOP_FILMS_IN_CATEGORY_TSQL: &str = r#"
SELECT TOP {limit} f.title, COUNT(r.rental_id) AS num_rentals
FROM film f
JOIN film_category fc ON fc.film_id = f.film_id
JOIN category c ON c.category_id = fc.category_id
JOIN inventory i ON i.film_id = f.film_id
JOIN rental r ON r.inventory_id = i.inventory_id
WHERE c.name = '{category}'
GROUP BY f.title
ORDER BY num_rentals DESC, f.title;
"#;

const TOP_FILMS_IN_CATEGORY_SQLITE: &str = r#"
SELECT f.title, COUNT(r.rental_id) AS num_rentals
FROM film f
JOIN film_category fc ON fc.film_id = f.film_id
JOIN category c ON c.category_id = fc.category_id
JOIN inventory i ON i.film_id = f.film_id
JOIN rental r ON r.inventory_id = i.inventory_id
WHERE c.name = '{category}'
GROUP BY f.title
ORDER BY num_rentals DESC, f.title
LIMIT {limit};
"#;

fn dialect_sql(dialect: &DatabaseType, tsql: &'static str, sqlite: &'static str) -> &'static str {
    match dialect {
        DatabaseType::SqlServer => tsql,
        DatabaseType::Sqlite => sqlite,
    }
}

/// Build the Sakila report catalog with query text for `dialect`
pub fn catalog(dialect: &DatabaseType) -> Result<Catalog, CatalogError> {
    Catalog::new(vec![
        QueryDefinition::new(
            1,
            AVERAGE_RENTAL_DURATION,
            dialect_sql(
                dialect,
                AVERAGE_RENTAL_DURATION_TSQL,
                AVERAGE_RENTAL_DURATION_SQLITE,
            ),
            2,
            ChartKind::Bar,
        )
        .labels("Customer Name", "Average Loan Period"),
        QueryDefinition::new(
            1,
            RENTALS_PER_CUSTOMER,
            RENTALS_PER_CUSTOMER_SQL,
            2,
            ChartKind::Histogram,
        )
        .labels("Rentals", "Customers"),
        QueryDefinition::new(
            1,
            SPECIFIED_RENTAL_ACTIVITY,
            dialect_sql(
                dialect,
                SPECIFIED_RENTAL_ACTIVITY_TSQL,
                SPECIFIED_RENTAL_ACTIVITY_SQLITE,
            ),
            2,
            ChartKind::Bar,
        )
        .labels("Day of Month", "Rentals")
        .parameters(&[("table", "rental"), ("day", "15")]),
        QueryDefinition::new(
            2,
            RENTALS_PER_MONTH,
            dialect_sql(dialect, RENTALS_PER_MONTH_TSQL, RENTALS_PER_MONTH_SQLITE),
            2,
            ChartKind::Line,
        )
        .labels("Month", "Rentals"),
        QueryDefinition::new(2, REVENUE_BY_STORE, REVENUE_BY_STORE_SQL, 2, ChartKind::Bar)
            .labels("Store", "Revenue"),
        QueryDefinition::new(2, FILMS_BY_RATING, FILMS_BY_RATING_SQL, 2, ChartKind::Pie)
            .labels("Rating", "Films"),
        QueryDefinition::new(
            3,
            RENTALS_BY_CATEGORY,
            RENTALS_BY_CATEGORY_SQL,
            3,
            ChartKind::Bar,
        )
        .labels("Category", "Rentals / Revenue"),
        QueryDefinition::new(
            3,
            TOP_FILMS_IN_CATEGORY,
            dialect_sql(
                dialect,
                TOP_FILMS_IN_CATEGORY_TSQL,
                TOP_FILMS_IN_CATEGORY_SQLITE,
            ),
            2,
            ChartKind::Bar,
        )
        .labels("Film", "Rentals")
        .parameters(&[("category", "Action"), ("limit", "10")]),
    ])
}
