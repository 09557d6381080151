// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Valid value sets for user preferences.
//!
//! Locales are the normalized names the glibc locale alias table maps to,
//! such as `en_US.ISO8859-1`, `am_ET.UTF-8` or `sr_RS.UTF-8@latin`. Only
//! those exact targets are accepted; alias keys like `en_us` are not.
//! Currencies are ISO 4217 alphabetic codes. Timezones are the IANA names
//! compiled into `chrono-tz`.

use chrono_tz::Tz;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Every value of the glibc-derived locale alias table, sorted.
const LOCALE_NAMES: &[&str] = &[
	"C", "aa_DJ.ISO8859-1", "aa_ER.UTF-8", "aa_ET.UTF-8", "af_ZA.ISO8859-1", "agr_PE.UTF-8",
	"ak_GH.UTF-8", "am_ET.UTF-8", "an_ES.ISO8859-15", "anp_IN.UTF-8", "ar_AA.ISO8859-6",
	"ar_AE.ISO8859-6", "ar_BH.ISO8859-6", "ar_DZ.ISO8859-6", "ar_EG.ISO8859-6", "ar_IN.UTF-8",
	"ar_IQ.ISO8859-6", "ar_JO.ISO8859-6", "ar_KW.ISO8859-6", "ar_LB.ISO8859-6", "ar_LY.ISO8859-6",
	"ar_MA.ISO8859-6", "ar_OM.ISO8859-6", "ar_QA.ISO8859-6", "ar_SA.ISO8859-6", "ar_SD.ISO8859-6",
	"ar_SS.UTF-8", "ar_SY.ISO8859-6", "ar_TN.ISO8859-6", "ar_YE.ISO8859-6", "as_IN.UTF-8",
	"ast_ES.ISO8859-15", "ayc_PE.UTF-8", "az_AZ.ISO8859-9E", "az_AZ.KOI8-C", "az_IR.UTF-8",
	"be_BY.CP1251", "be_BY.UTF-8@latin", "bem_ZM.UTF-8", "ber_DZ.UTF-8", "ber_MA.UTF-8",
	"bg_BG.CP1251", "bg_BG.UTF-8", "bhb_IN.UTF-8", "bho_IN.UTF-8", "bho_NP.UTF-8", "bi_VU.UTF-8",
	"bn_BD.UTF-8", "bn_IN.UTF-8", "bo_CN.UTF-8", "bo_IN.UTF-8", "br_FR.ISO8859-1", "brx_IN.UTF-8",
	"bs_BA.ISO8859-2", "byn_ER.UTF-8", "ca_AD.ISO8859-1", "ca_ES.ISO8859-1",
	"ca_ES.UTF-8@valencia", "ca_FR.ISO8859-1", "ca_IT.ISO8859-1", "ce_RU.UTF-8", "chr_US.UTF-8",
	"ckb_IQ.UTF-8", "cmn_TW.UTF-8", "crh_UA.UTF-8", "cs_CZ.ISO8859-2", "csb_PL.UTF-8",
	"cv_RU.UTF-8", "cy_GB.ISO8859-1", "da_DK.ISO8859-1", "de_AT.ISO8859-1", "de_BE.ISO8859-1",
	"de_CH.ISO8859-1", "de_DE.ISO8859-1", "de_IT.ISO8859-1", "de_LI.UTF-8", "de_LU.ISO8859-1",
	"doi_IN.UTF-8", "dv_MV.UTF-8", "dz_BT.UTF-8", "ee_EE.ISO8859-4", "el_CY.ISO8859-7",
	"el_GR.ISO8859-15", "el_GR.ISO8859-7", "en_AG.UTF-8", "en_AU.ISO8859-1", "en_BE.ISO8859-1",
	"en_BW.ISO8859-1", "en_CA.ISO8859-1", "en_DK.ISO8859-1", "en_DL.UTF-8", "en_EN.ISO8859-1",
	"en_GB.ISO8859-1", "en_HK.ISO8859-1", "en_IE.ISO8859-1", "en_IL.UTF-8", "en_IN.ISO8859-1",
	"en_NG.UTF-8", "en_NZ.ISO8859-1", "en_PH.ISO8859-1", "en_SC.UTF-8", "en_SG.ISO8859-1",
	"en_US.ISO8859-1", "en_US.ISO8859-15", "en_US.UTF-8", "en_US.utf", "en_ZA.ISO8859-1",
	"en_ZM.UTF-8", "en_ZS.UTF-8", "en_ZW.ISO8859-1", "eo.UTF-8", "eo_EO.ISO8859-3", "eo_US.UTF-8",
	"eo_XX.ISO8859-3", "es_AR.ISO8859-1", "es_BO.ISO8859-1", "es_CL.ISO8859-1", "es_CO.ISO8859-1",
	"es_CR.ISO8859-1", "es_CU.UTF-8", "es_DO.ISO8859-1", "es_EC.ISO8859-1", "es_ES.ISO8859-1",
	"es_GT.ISO8859-1", "es_HN.ISO8859-1", "es_MX.ISO8859-1", "es_NI.ISO8859-1", "es_PA.ISO8859-1",
	"es_PE.ISO8859-1", "es_PR.ISO8859-1", "es_PY.ISO8859-1", "es_SV.ISO8859-1", "es_US.ISO8859-1",
	"es_UY.ISO8859-1", "es_VE.ISO8859-1", "et_EE.ISO8859-1", "et_EE.ISO8859-15",
	"eu_ES.ISO8859-1", "eu_FR.ISO8859-1", "fa_IR.ISIRI-3342", "fa_IR.UTF-8", "ff_SN.UTF-8",
	"fi_FI.ISO8859-1", "fi_FI.ISO8859-15", "fil_PH.UTF-8", "fo_FO.ISO8859-1", "fr_BE.ISO8859-1",
	"fr_CA.ISO8859-1", "fr_CH.ISO8859-1", "fr_FR.ISO8859-1", "fr_LU.ISO8859-1", "fur_IT.UTF-8",
	"fy_DE.UTF-8", "fy_NL.UTF-8", "ga_IE.ISO8859-1", "gd_GB.ISO8859-1", "gez_ER.UTF-8",
	"gez_ET.UTF-8", "gl_ES.ISO8859-1", "gu_IN.UTF-8", "gv_GB.ISO8859-1", "ha_NG.UTF-8",
	"hak_TW.UTF-8", "he_IL.ISO8859-8", "hi_IN.ISCII-DEV", "hif_FJ.UTF-8", "hne_IN.UTF-8",
	"hr_HR.ISO8859-2", "hsb_DE.ISO8859-2", "ht_HT.UTF-8", "hu_HU.ISO8859-2", "hy_AM.ARMSCII_8",
	"hy_AM.UTF-8", "ia.UTF-8", "ia_FR.UTF-8", "id_ID.ISO8859-1", "ig_NG.UTF-8", "ik_CA.UTF-8",
	"is_IS.ISO8859-1", "it_CH.ISO8859-1", "it_IT.ISO8859-1", "iu_CA.NUNACOM-8", "iw_IL.UTF-8",
	"ja_JP.SJIS", "ja_JP.eucJP", "ka_GE.GEORGIAN-ACADEMY", "ka_GE.GEORGIAN-PS", "kab_DZ.UTF-8",
	"kk_KZ.ptcp154", "kl_GL.ISO8859-1", "km_KH.UTF-8", "kn_IN.UTF-8", "ko_KR.eucKR",
	"kok_IN.UTF-8", "ks_IN.UTF-8", "ks_IN.UTF-8@devanagari", "ku_TR.ISO8859-9", "kw_GB.ISO8859-1",
	"ky_KG.UTF-8", "lb_LU.UTF-8", "lg_UG.ISO8859-10", "li_BE.UTF-8", "li_NL.UTF-8",
	"lij_IT.UTF-8", "ln_CD.UTF-8", "lo_LA.IBM-CP1133", "lo_LA.MULELAO-1", "lt_LT.ISO8859-13",
	"lv_LV.ISO8859-13", "lzh_TW.UTF-8", "mag_IN.UTF-8", "mai_IN.UTF-8", "mai_NP.UTF-8",
	"mfe_MU.UTF-8", "mg_MG.ISO8859-15", "mhr_RU.UTF-8", "mi_NZ.ISO8859-1", "miq_NI.UTF-8",
	"mjw_IN.UTF-8", "mk_MK.ISO8859-5", "ml_IN.UTF-8", "mn_MN.UTF-8", "mni_IN.UTF-8",
	"mr_IN.UTF-8", "ms_MY.ISO8859-1", "mt_MT.ISO8859-3", "my_MM.UTF-8", "nan_TW.UTF-8",
	"nb_NO.ISO8859-1", "nds_DE.UTF-8", "nds_NL.UTF-8", "ne_NP.UTF-8", "nhn_MX.UTF-8",
	"niu_NU.UTF-8", "niu_NZ.UTF-8", "nl_AW.UTF-8", "nl_BE.ISO8859-1", "nl_NL.ISO8859-1",
	"nn_NO.ISO8859-1", "no_NO.ISO8859-1", "nr_ZA.ISO8859-1", "nso_ZA.ISO8859-15",
	"ny_NO.ISO8859-1", "oc_FR.ISO8859-1", "om_ET.UTF-8", "om_KE.ISO8859-1", "or_IN.UTF-8",
	"os_RU.UTF-8", "pa_IN.UTF-8", "pa_PK.UTF-8", "pap_AN.UTF-8", "pap_AW.UTF-8", "pap_CW.UTF-8",
	"pd_DE.ISO8859-1", "pd_US.ISO8859-1", "ph_PH.ISO8859-1", "pl_PL.ISO8859-2", "pp_AN.ISO8859-1",
	"ps_AF.UTF-8", "pt_BR.ISO8859-1", "pt_PT.ISO8859-1", "quz_PE.UTF-8", "raj_IN.UTF-8",
	"ro_RO.ISO8859-2", "ru_RU.KOI8-R", "ru_RU.UTF-8", "ru_UA.KOI8-U", "rw_RW.ISO8859-1",
	"sa_IN.UTF-8", "sat_IN.UTF-8", "sc_IT.UTF-8", "sd_IN.UTF-8", "sd_IN.UTF-8@devanagari",
	"sd_PK.UTF-8", "se_NO.UTF-8", "sgs_LT.UTF-8", "sh_HR.ISO8859-2", "shn_MM.UTF-8",
	"shs_CA.UTF-8", "si_LK.UTF-8", "sid_ET.UTF-8", "sk_SK.ISO8859-2", "sl_CS.ISO8859-2",
	"sl_SI.ISO8859-2", "sm_WS.UTF-8", "so_DJ.ISO8859-1", "so_ET.UTF-8", "so_KE.ISO8859-1",
	"so_SO.ISO8859-1", "sq_AL.ISO8859-2", "sq_MK.UTF-8", "sr_CS.CP1251", "sr_CS.ISO8859-2",
	"sr_CS.ISO8859-5", "sr_CS.UTF-8", "sr_CS.UTF-8@latin", "sr_ME.UTF-8", "sr_RS.UTF-8",
	"sr_RS.UTF-8@latin", "ss_ZA.ISO8859-1", "st_ZA.ISO8859-1", "sv_FI.ISO8859-1",
	"sv_SE.ISO8859-1", "sw_KE.UTF-8", "sw_TZ.UTF-8", "szl_PL.UTF-8", "ta_IN.TSCII-0",
	"ta_LK.UTF-8", "tcy_IN.UTF-8", "te_IN.UTF-8", "tg_TJ.KOI8-C", "th_TH.ISO8859-11",
	"th_TH.TIS620", "the_NP.UTF-8", "ti_ER.UTF-8", "ti_ET.UTF-8", "tig_ER.UTF-8", "tk_TM.UTF-8",
	"tl_PH.ISO8859-1", "tn_ZA.ISO8859-15", "to_TO.UTF-8", "tpi_PG.UTF-8", "tr_CY.ISO8859-9",
	"tr_TR.ISO8859-9", "ts_ZA.ISO8859-1", "tt_RU.TATAR-CYR", "tt_RU.UTF-8@iqtelif", "ug_CN.UTF-8",
	"uk_UA.KOI8-U", "unm_US.UTF-8", "ur_IN.UTF-8", "ur_PK.CP1256", "uz_UZ.UTF-8", "ve_ZA.UTF-8",
	"vi_VN.TCVN", "vi_VN.VISCII", "wa_BE.ISO8859-1", "wae_CH.UTF-8", "wal_ET.UTF-8",
	"wo_SN.UTF-8", "xh_ZA.ISO8859-1", "yi_US.CP1255", "yo_NG.UTF-8", "yue_HK.UTF-8",
	"yuw_PG.UTF-8", "zh_CN.eucCN", "zh_CN.gb2312", "zh_HK.big5hkscs", "zh_SG.GB2312", "zh_SG.GBK",
	"zh_TW.big5", "zh_TW.eucTW", "zu_ZA.ISO8859-1",
];

/// ISO 4217 alphabetic codes in current use.
const CURRENCY_CODES: &[&str] = &[
	"AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
	"BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
	"CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD",
	"EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ",
	"GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD",
	"JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR",
	"LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR",
	"MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN",
	"PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR",
	"SDG", "SEK", "SGD", "SHP", "SLE", "SOS", "SRD", "SSP", "STN", "SYP", "SZL", "THB", "TJS",
	"TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS", "VES",
	"VND", "VUV", "WST", "XAF", "XCD", "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

static LOCALES: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| LOCALE_NAMES.iter().copied().collect());

static CURRENCIES: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| CURRENCY_CODES.iter().copied().collect());

pub fn is_valid_locale(value: &str) -> bool {
	LOCALES.contains(value)
}

pub fn is_valid_currency(value: &str) -> bool {
	CURRENCIES.contains(value)
}

/// Case-sensitive IANA name lookup, so `"utc"` is rejected while `"UTC"` passes.
pub fn is_valid_timezone(value: &str) -> bool {
	value.parse::<Tz>().is_ok()
}
