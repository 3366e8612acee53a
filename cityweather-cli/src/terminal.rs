use std::io::Write;

use cityweather_core::{HtmlPage, View};

/// Page that also mirrors the banner and, when asked, the city clock on stderr.
#[derive(Debug, Default)]
pub struct TerminalPage {
    page: HtmlPage,
    echo_clock: bool,
}

impl TerminalPage {
    pub fn new(echo_clock: bool) -> Self {
        Self { page: HtmlPage::default(), echo_clock }
    }

    pub fn page(&self) -> &HtmlPage {
        &self.page
    }
}

impl View for TerminalPage {
    fn set_loading(&mut self, visible: bool) {
        self.page.set_loading(visible);
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {message}");
        self.page.show_error(message);
    }

    fn hide_error(&mut self) {
        self.page.hide_error();
    }

    fn set_current(&mut self, html: String) {
        self.page.set_current(html);
    }

    fn set_forecast(&mut self, html: String) {
        self.page.set_forecast(html);
    }

    fn set_background(&mut self, css: &str) {
        self.page.set_background(css);
    }

    fn set_clock(&mut self, date: &str, time: &str) {
        if self.echo_clock {
            let mut err = std::io::stderr().lock();
            let _ = write!(err, "\r{date}  {time}    ");
            let _ = err.flush();
        }
        self.page.set_clock(date, time);
    }

    fn set_city_list(&mut self, html: String) {
        self.page.set_city_list(html);
    }
}
