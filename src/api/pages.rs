//! Server-rendered HTML pages.
//!
//! Views take plain data and return markup. All user-supplied text goes
//! through `html_escape` before it reaches the page.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use crate::models::car::Car;
use crate::models::review::{Review, ReviewSort};
use crate::selection::INVALID_MODEL_PROMPT;
use crate::services::review_service::{MAX_RATING, MIN_RATING};

pub struct ReviewsView<'a> {
    pub car: &'a Car,
    pub reviews: &'a [Review],
    pub sort: ReviewSort,
    pub username: Option<&'a str>,
    pub is_admin: bool,
}

fn layout(title: &str, username: Option<&str>, content: &str) -> String {
    let account = username.map_or_else(
        || r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#.to_string(),
        |name| format!(r#"<span>Signed in as {}</span> <a href="/logout">Log out</a>"#, text(name)),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/css/site.css">
</head>
<body>
<nav><a href="/">Car Reviews</a><span class="spacer"></span>{account}</nav>
{content}
</body>
</html>
"#,
        title = text(title),
    )
}

fn error_block(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!(r#"<p class="error">{}</p>"#, text(e))
    })
}

#[must_use]
pub fn home(makes: &[String], username: Option<&str>) -> String {
    let mut options = String::new();
    for make in makes {
        let _ = write!(
            options,
            r#"<option value="{}">{}</option>"#,
            attr(make),
            text(make)
        );
    }

    let content = format!(
        r#"<h1>Find a car</h1>
<form id="carForm" data-invalid-model-prompt="{prompt}">
<label>Make
<select id="makeDropdown" name="make"><option value="">Select Make</option>{options}</select>
</label>
<label>Model
<select id="modelDropdown" name="model" disabled><option value="">Select Model</option></select>
</label>
<label>Year
<select id="yearDropdown" name="year" disabled><option value="">Select Year</option></select>
</label>
<button type="submit">See reviews</button>
</form>
<script src="/assets/js/car_selection.js"></script>"#,
        prompt = attr(INVALID_MODEL_PROMPT),
    );

    layout("Car Reviews", username, &content)
}

#[must_use]
pub fn login(error: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Log in</h1>
{}
<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#,
        error_block(error)
    );

    layout("Log in", None, &content)
}

#[must_use]
pub fn register(error: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Register</h1>
{}
<form method="post" action="/register">
<label>Email <input name="email" type="email" required></label>
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Create account</button>
</form>"#,
        error_block(error)
    );

    layout("Register", None, &content)
}

fn review_card(out: &mut String, review: &Review, logged_in: bool, is_admin: bool) {
    let _ = write!(
        out,
        r#"<article class="review" id="review-{id}">
<h3>{title}</h3>
<p class="meta">{rating}/{max} by {author} on {date}</p>
<p>{body}</p>
<div class="votes"><span>👍 {likes}</span> <span>👎 {dislikes}</span>"#,
        id = review.id,
        title = text(&review.title),
        rating = review.rating,
        max = MAX_RATING,
        author = text(&review.author),
        date = text(&review.date_posted),
        body = text(&review.body),
        likes = review.likes,
        dislikes = review.dislikes,
    );

    if logged_in {
        let _ = write!(
            out,
            r#"
<form class="inline" method="post" action="/reviews/{id}/like"><button type="submit">Like</button></form>
<form class="inline" method="post" action="/reviews/{id}/dislike"><button type="submit">Dislike</button></form>"#,
            id = review.id
        );
    }

    if is_admin {
        let _ = write!(
            out,
            r#"
<form class="inline" method="post" action="/reviews/{id}/delete"><button type="submit">Delete</button></form>"#,
            id = review.id
        );
    }

    out.push_str("</div>\n</article>\n");
}

#[must_use]
pub fn reviews(view: &ReviewsView<'_>) -> String {
    let car = view.car;
    let heading = format!("{} {} {}", car.year, car.make, car.model);
    let logged_in = view.username.is_some();

    let mut content = format!("<h1>{}</h1>\n", text(&heading));
    if let Some(base) = &car.base_model {
        let _ = writeln!(content, "<p>Base model: {}</p>", text(base));
    }

    content.push_str("<p>Sort: ");
    for sort in ReviewSort::ALL {
        if sort == view.sort {
            let _ = write!(content, "<strong>{}</strong> ", sort.label());
        } else {
            let _ = write!(
                content,
                r#"<a href="/reviews/{}?sort={}">{}</a> "#,
                car.id,
                sort.as_query(),
                sort.label()
            );
        }
    }
    content.push_str("</p>\n");

    if view.reviews.is_empty() {
        content.push_str("<p>No reviews yet.</p>\n");
    }
    for review in view.reviews {
        review_card(&mut content, review, logged_in, view.is_admin);
    }

    if logged_in {
        let _ = write!(
            content,
            r#"<h2>Write a review</h2>
<form method="post" action="/submit-review">
<input type="hidden" name="car_id" value="{car_id}">
<label>Title <input name="review_title" required></label>
<label>Review <textarea name="review_body" required></textarea></label>
<label>Rating <input name="rating" type="number" min="{min}" max="{max}" required></label>
<button type="submit">Post review</button>
</form>"#,
            car_id = car.id,
            min = MIN_RATING,
            max = MAX_RATING,
        );
    } else {
        content.push_str(r#"<p><a href="/login">Log in</a> to write a review.</p>"#);
    }

    layout(&heading, view.username, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn car() -> Car {
        Car {
            id: 42,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            year: "2019".to_string(),
            base_model: None,
        }
    }

    fn review(title: &str) -> Review {
        Review {
            id: 1,
            car_id: 42,
            title: title.to_string(),
            body: "Loved it".to_string(),
            rating: 5,
            author: "alice".to_string(),
            date_posted: "2024-01-01T00:00:00.000000Z".to_string(),
            likes: 0,
            dislikes: 0,
            liked_by: BTreeSet::new(),
            disliked_by: BTreeSet::new(),
        }
    }

    #[test]
    fn review_text_is_escaped() {
        let car = car();
        let reviews = vec![review("<script>alert(1)</script>")];
        let html = reviews_page(&car, &reviews, None, false);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn controls_depend_on_login_and_admin() {
        let car = car();
        let reviews = vec![review("Great")];

        let anonymous = reviews_page(&car, &reviews, None, false);
        assert!(!anonymous.contains("/reviews/1/like"));
        assert!(!anonymous.contains("/submit-review"));

        let user = reviews_page(&car, &reviews, Some("alice"), false);
        assert!(user.contains("/reviews/1/like"));
        assert!(user.contains("/submit-review"));
        assert!(!user.contains("/reviews/1/delete"));

        let admin = reviews_page(&car, &reviews, Some("root"), true);
        assert!(admin.contains("/reviews/1/delete"));
    }

    #[test]
    fn home_lists_makes() {
        let html = home(&["Honda".to_string(), "Mercedes-Benz".to_string()], Some("alice"));
        assert!(html.contains(r#"<option value="Mercedes-Benz">"#));
        assert!(html.contains("Signed in as alice"));
        assert!(html.contains("car_selection.js"));
        assert!(html.contains(r#"data-invalid-model-prompt="Please select a valid model.""#));
    }

    fn reviews_page(
        car: &Car,
        reviews: &[Review],
        username: Option<&str>,
        is_admin: bool,
    ) -> String {
        super::reviews(&ReviewsView {
            car,
            reviews,
            sort: ReviewSort::Newest,
            username,
            is_admin,
        })
    }
}
