use super::*;

const EDGE_UA: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91"
);
const CHROME_UA: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/121.0.0.0 Safari/537.36"
);
const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0";
const SAFARI_UA: &str = concat!(
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 ",
    "(KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1"
);

#[test]
fn browser_codes() {
    assert_eq!(Env::detect(EDGE_UA, 1440, 900).ua, "E/120");
    assert_eq!(Env::detect(CHROME_UA, 1440, 900).ua, "C/121");
    assert_eq!(Env::detect(FIREFOX_UA, 1440, 900).ua, "F/122");
    assert_eq!(Env::detect(SAFARI_UA, 390, 844).ua, "S/17");
    assert_eq!(Env::detect("curl/8.5.0", 0, 0).ua, "O/");
}

#[test]
fn viewport_and_device_class() {
    let env = Env::detect(SAFARI_UA, 390, 844);
    assert_eq!(env.vp, [390, 844]);
    assert_eq!(env.dt, DeviceClass::Mobile);
    assert_eq!(Env::detect(CHROME_UA, 800, 600).dt, DeviceClass::Tablet);
    assert_eq!(Env::detect(CHROME_UA, 1920, 1080).dt, DeviceClass::Desktop);
}
