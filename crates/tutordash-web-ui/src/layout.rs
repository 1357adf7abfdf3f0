use maud::{DOCTYPE, Markup, html};
use tutordash_core::view::DashboardView;

use crate::UiState;
use crate::session::AuthenticatedUser;

impl UiState {
    /// Html page header
    pub(crate) fn render_html_head(&self, page_title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en";
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                link rel="stylesheet" type="text/css" href="/assets/style.css";
                title { (page_title) " - Tutor Dashboard" }
            }
        }
    }

    pub(crate) fn render_html_page(&self, title: &str, content: Markup) -> Markup {
        html! {
            (self.render_html_head(title))
            body ."o-body" {
                div ."o-pageLayout" { (content) }
            }
        }
    }

    /// Full dashboard page: sidebar with the views `user` may open, header,
    /// and `main_content` for the `active` view.
    pub(crate) fn render_dashboard_page(
        &self,
        user: &AuthenticatedUser,
        active: DashboardView,
        sidebar_open: bool,
        main_content: Markup,
    ) -> Markup {
        let content = html! {
            (render_sidebar(user, active, sidebar_open))
            div ."o-mainColumn" {
                (render_header(user, active))
                main ."o-mainBar" {
                    (main_content)
                }
            }
        };
        self.render_html_page(active.title(), content)
    }
}

fn render_sidebar(user: &AuthenticatedUser, active: DashboardView, open: bool) -> Markup {
    html! {
        nav ."o-sidebar" ."-collapsed"[!open] data-state=(if open { "expanded" } else { "collapsed" }) {
            div ."o-sidebar__header" {
                span ."o-sidebar__title" { "Tutor Dashboard" }
                form action="/sidebar/toggle" method="post" {
                    input type="hidden" name="redirect" value=(active.href());
                    button ."o-sidebar__toggle u-button" type="submit"
                        title=(if open { "Collapse sidebar" } else { "Expand sidebar" })
                    { (if open { "«" } else { "»" }) }
                }
            }
            ul ."o-sidebar__menu" {
                @for view in DashboardView::visible_to(&user.profile) {
                    li ."o-sidebar__item" ."-active"[view == active] {
                        a href=(view.href()) { (view.title()) }
                    }
                }
            }
        }
    }
}

fn render_header(user: &AuthenticatedUser, active: DashboardView) -> Markup {
    html! {
        header ."o-header" {
            h1 ."o-header__title" { (active.title()) }
            div ."o-header__account" {
                span ."o-header__role" { "Logged in as " strong { (user.role().label()) } }
                form action="/logout" method="post" {
                    button ."o-header__logout u-button" type="submit" { "Logout" }
                }
            }
        }
    }
}

/// Inline notice, e.g. a rejected login or a failed data fetch.
pub(crate) fn render_notice(kind: &str, message: &str) -> Markup {
    html! {
        div class=(format!("o-notice -{kind}")) role="alert" { (message) }
    }
}
