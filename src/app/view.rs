// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! The root container fills the window with the screen background and
//! mounts the capture screen in its centre.

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let (r, g, b) = ui::BACKGROUND_RGB;

        widget::container(self.build_capture_screen())
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(ui::SCREEN_PADDING)
            .style(move |_theme| widget::container::Style {
                background: Some(Background::Color(Color::from_rgb8(r, g, b))),
                text_color: Some(Color::from_rgb8(0x1C, 0x1C, 0x1E)),
                ..Default::default()
            })
            .into()
    }
}
