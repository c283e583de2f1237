// Module exports for pure logic
pub mod navigation;
pub mod tabs;      // Tab list, active tab, url subscription
pub mod theme;
pub mod webview;   // Web view / host / address bar seams
