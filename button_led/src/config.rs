/// Lines and parameters the driver binds to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonLedConfig {
    /// Output line driving the LED.
    pub led_line: u32,
    /// Input line wired to the push button.
    pub button_line: u32,
    pub debounce_ms: u32,
    /// Owner label of both lines.
    pub label: &'static str,
    /// Name of the interrupt registration.
    pub irq_name: &'static str,
}

impl ButtonLedConfig {
    /// VAR-DART-6UL evaluation board: LED on J13 pin 2 (GPIO4_IO24), button
    /// SW4 (GPIO1_IO00).
    pub const VAR_DART_6UL: Self = Self {
        led_line: 120,
        button_line: 0,
        debounce_ms: 200,
        label: "sysfs",
        irq_name: "button_led_handler",
    };
}

impl Default for ButtonLedConfig {
    fn default() -> Self {
        Self::VAR_DART_6UL
    }
}
