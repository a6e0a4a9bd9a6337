mod legacy_page;
mod scenarios;
mod widgets;
