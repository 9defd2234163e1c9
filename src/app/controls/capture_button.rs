// SPDX-License-Identifier: GPL-3.0-only

//! Capture button widget implementation

use crate::app::state::{Action, AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the capture button widget
    ///
    /// - Ready: White circle
    /// - Capturing: Gray, slightly smaller
    /// - Disabled (no frame yet, or an action running): Grayed out and non-interactive
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let enabled = self.screen.can_capture();
        let capturing = self.screen.in_flight() == Some(Action::Capture);

        let color = if capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else if !enabled {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3)
        } else {
            Color::WHITE
        };

        let (inner_size, outer_size) = if capturing {
            (
                ui::CAPTURE_BUTTON_INNER * 0.85, // Press down effect
                ui::CAPTURE_BUTTON_OUTER * 0.85,
            )
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = widget::button::custom(button_inner)
            .on_press_maybe(enabled.then_some(Message::Capture))
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));

        // Fixed-size wrapper so the layout does not shift while the button shrinks
        let button_wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER);

        widget::tooltip(
            button_wrapper,
            widget::text(fl!("capture-image")),
            widget::tooltip::Position::Top,
        )
        .into()
    }
}
