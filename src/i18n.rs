/// UI message keys with built-in English text
///
/// browser.i18n is consulted first (see `browser::t`); these strings are used when
/// the active locale has no entry for a key.

pub const EXTENSION_NAME: &str = "extensionName";
pub const TOAST_URL_CREATED: &str = "toastUrlCreated";
pub const TOAST_URL_EXISTS: &str = "toastUrlExists";
pub const TOAST_URL_DELETED: &str = "toastUrlDeleted";
pub const MENU_SHORTEN_PAGE: &str = "menuItemShortenPage";
pub const MENU_SHORTEN_SELECTION: &str = "menuItemShortenSelection";
pub const MENU_SHORTEN_LINK: &str = "menuItemShortenLink";

pub const POPUP_STATUS_READY: &str = "popupStatusReady";
pub const POPUP_STATUS_SHORTENING: &str = "popupStatusShortening";
pub const POPUP_STATUS_CREATED: &str = "popupStatusCreated";
pub const POPUP_INFO_ALREADY_SHORTENED: &str = "popupInfoAlreadyShortened";
pub const POPUP_INFO_AUTO_STATS: &str = "popupInfoAutoStats";
pub const POPUP_STATUS_FETCHING_STATS: &str = "popupStatusFetchingStats";
pub const POPUP_STATUS_STATS_RESULT: &str = "popupStatusStatsResult";
pub const POPUP_STATUS_DELETING: &str = "popupStatusDeleting";
pub const POPUP_STATUS_DELETED: &str = "popupStatusDeleted";
pub const POPUP_STATUS_COPIED: &str = "popupStatusCopied";
pub const POPUP_ERROR_INVALID_URL: &str = "popupErrorInvalidUrl";
pub const POPUP_ERROR_ENTER_URL_FOR_STATS: &str = "popupErrorEnterUrlForStats";
pub const POPUP_ERROR_PROVIDE_URL_TO_DELETE: &str = "popupErrorProvideUrlToDelete";
pub const POPUP_ERROR_COPY_FAILED: &str = "popupErrorCopyFailed";
pub const POPUP_BTN_DELETE: &str = "popupBtnDelete";
pub const POPUP_BTN_CONFIRM_DELETE: &str = "popupBtnConfirmDelete";
pub const POPUP_SETUP_NEEDED: &str = "popupSetupNeeded";
pub const POPUP_ERROR_QR_FAILED: &str = "popupErrorQrFailed";

// Popup labels and captions
pub const POPUP_LABEL_LONG_URL: &str = "popupLabelLongUrl";
pub const POPUP_LABEL_KEYWORD: &str = "popupLabelKeyword";
pub const POPUP_LABEL_TITLE: &str = "popupLabelTitle";
pub const POPUP_LABEL_SHORT_URL: &str = "popupLabelShortUrl";
pub const POPUP_LABEL_STATS_INPUT: &str = "popupLabelStatsInput";
pub const POPUP_BTN_SHORTEN: &str = "popupBtnShorten";
pub const POPUP_BTN_COPY_CLOSE: &str = "popupBtnCopyClose";
pub const POPUP_BTN_QR_CODE: &str = "popupBtnQrCode";
pub const POPUP_BTN_HIDE_QR_CODE: &str = "popupBtnHideQrCode";
pub const POPUP_BTN_DOWNLOAD_QR: &str = "popupBtnDownloadQr";
pub const POPUP_BTN_STATS: &str = "popupBtnStats";
pub const POPUP_BTN_DETAILS: &str = "popupBtnDetails";
pub const POPUP_BTN_HIDE_DETAILS: &str = "popupBtnHideDetails";
pub const POPUP_BTN_OPEN_SETTINGS: &str = "popupBtnOpenSettings";
pub const POPUP_LINK_SETTINGS: &str = "popupLinkSettings";
pub const ERROR_SHORTEN_FAILED: &str = "errorShortenFailed";
pub const ERROR_STATS_FAILED: &str = "errorStatsFailed";
pub const ERROR_DELETE_FAILED: &str = "errorDeleteFailed";

pub const OPTIONS_STATUS_LOADED: &str = "optionsStatusLoaded";
pub const OPTIONS_STATUS_SAVED: &str = "optionsStatusSaved";
pub const OPTIONS_STATUS_ENTER_URL_AND_TOKEN: &str = "optionsStatusEnterUrlAndToken";
pub const OPTIONS_STATUS_PERM_NOT_GRANTED: &str = "optionsStatusPermNotGranted";
pub const OPTIONS_STATUS_PERM_REQUEST_ERROR: &str = "optionsStatusPermRequestError";
pub const OPTIONS_STATUS_CONN_OK: &str = "optionsStatusConnOk";
pub const OPTIONS_STATUS_CONN_FAILED: &str = "optionsStatusConnFailed";
pub const OPTIONS_STATUS_ENTER_URL_TO_REMOVE: &str = "optionsStatusEnterUrlToRemove";
pub const OPTIONS_STATUS_PERM_REMOVED: &str = "optionsStatusPermRemoved";
pub const OPTIONS_STATUS_PERM_REMOVE_ERROR: &str = "optionsStatusPermRemoveError";

// Options labels and captions
pub const OPTIONS_TITLE: &str = "optionsTitle";
pub const OPTIONS_LABEL_URL: &str = "optionsLabelUrl";
pub const OPTIONS_LABEL_SIGNATURE: &str = "optionsLabelSignature";
pub const OPTIONS_LABEL_AUTO_COPY: &str = "optionsLabelAutoCopy";
pub const OPTIONS_BTN_SAVE: &str = "optionsBtnSave";
pub const OPTIONS_BTN_TEST: &str = "optionsBtnTest";
pub const OPTIONS_BTN_REMOVE_PERMISSION: &str = "optionsBtnRemovePermission";

/// English text for a key; the key itself when unknown
pub fn fallback(key: &str) -> &str {
    match key {
        EXTENSION_NAME => "kurl",
        TOAST_URL_CREATED => "Short URL created and ready.",
        TOAST_URL_EXISTS => "This URL was already shortened.",
        TOAST_URL_DELETED => "Short URL deleted.",
        MENU_SHORTEN_PAGE => "Shorten this page",
        MENU_SHORTEN_SELECTION => "Shorten selected URL",
        MENU_SHORTEN_LINK => "Shorten this link",

        POPUP_STATUS_READY => "Ready.",
        POPUP_STATUS_SHORTENING => "Shortening...",
        POPUP_STATUS_CREATED => "Short URL created.",
        POPUP_INFO_ALREADY_SHORTENED => "This URL was already shortened; showing the existing link.",
        POPUP_INFO_AUTO_STATS => "Existing short URL detected, loading stats...",
        POPUP_STATUS_FETCHING_STATS => "Fetching stats...",
        POPUP_STATUS_STATS_RESULT => "$1 → $2 ($3 clicks)",
        POPUP_STATUS_DELETING => "Deleting...",
        POPUP_STATUS_DELETED => "Short URL deleted.",
        POPUP_STATUS_COPIED => "Copied to clipboard.",
        POPUP_ERROR_INVALID_URL => "Please enter a valid http(s) URL.",
        POPUP_ERROR_ENTER_URL_FOR_STATS => "Enter a short URL or keyword to look up.",
        POPUP_ERROR_PROVIDE_URL_TO_DELETE => "Enter a short URL or keyword to delete.",
        POPUP_ERROR_COPY_FAILED => "Could not copy to clipboard.",
        POPUP_BTN_DELETE => "Delete",
        POPUP_BTN_CONFIRM_DELETE => "Confirm delete?",
        POPUP_SETUP_NEEDED => "Set your YOURLS URL and API signature to get started.",
        POPUP_ERROR_QR_FAILED => "Could not create the QR code.",
        POPUP_LABEL_LONG_URL => "Long URL",
        POPUP_LABEL_KEYWORD => "Custom keyword (optional)",
        POPUP_LABEL_TITLE => "Title (optional)",
        POPUP_LABEL_SHORT_URL => "Short URL",
        POPUP_LABEL_STATS_INPUT => "Short URL or keyword",
        POPUP_BTN_SHORTEN => "Shorten",
        POPUP_BTN_COPY_CLOSE => "Copy & Close",
        POPUP_BTN_QR_CODE => "QR code",
        POPUP_BTN_HIDE_QR_CODE => "Hide QR code",
        POPUP_BTN_DOWNLOAD_QR => "Download PNG",
        POPUP_BTN_STATS => "Stats",
        POPUP_BTN_DETAILS => "Details",
        POPUP_BTN_HIDE_DETAILS => "Hide details",
        POPUP_BTN_OPEN_SETTINGS => "Open settings",
        POPUP_LINK_SETTINGS => "Settings",
        ERROR_SHORTEN_FAILED => "Shortening failed.",
        ERROR_STATS_FAILED => "Could not fetch statistics.",
        ERROR_DELETE_FAILED => "Delete failed.",

        OPTIONS_STATUS_LOADED => "Settings loaded.",
        OPTIONS_STATUS_SAVED => "Settings saved.",
        OPTIONS_STATUS_ENTER_URL_AND_TOKEN => "Enter the YOURLS URL and API signature first.",
        OPTIONS_STATUS_PERM_NOT_GRANTED => "Permission to access the server was not granted.",
        OPTIONS_STATUS_PERM_REQUEST_ERROR => "Permission request failed: ",
        OPTIONS_STATUS_CONN_OK => "Connection OK. Total links: $1",
        OPTIONS_STATUS_CONN_FAILED => "Connection failed. Check the URL and API signature.",
        OPTIONS_STATUS_ENTER_URL_TO_REMOVE => "Enter the YOURLS URL whose permission should be removed.",
        OPTIONS_STATUS_PERM_REMOVED => "Permission removed.",
        OPTIONS_STATUS_PERM_REMOVE_ERROR => "Could not remove permission: ",
        OPTIONS_TITLE => "$1 settings",
        OPTIONS_LABEL_URL => "YOURLS URL",
        OPTIONS_LABEL_SIGNATURE => "API signature",
        OPTIONS_LABEL_AUTO_COPY => "Copy new short URLs to the clipboard automatically",
        OPTIONS_BTN_SAVE => "Save",
        OPTIONS_BTN_TEST => "Test connection",
        OPTIONS_BTN_REMOVE_PERMISSION => "Remove permission",
        other => other,
    }
}

/// Replace $1..$9 with the given substitutions
pub fn substitute(template: &str, subs: &[&str]) -> String {
    let mut out = template.to_string();
    // highest index first so $1 does not eat the start of $10-style tokens
    for (idx, sub) in subs.iter().enumerate().rev() {
        out = out.replace(&format!("${}", idx + 1), sub);
    }
    out
}

/// Fallback text with substitutions applied
pub fn english(key: &str, subs: &[&str]) -> String {
    substitute(fallback(key), subs)
}
