//! The built-in demo dataset: three Dhaka freight corridors (OSRM
//! polyline6 geometry), a ten-vehicle fleet, and the static map overlays
//! that ship with them.

use crate::geodesy::LatLng;
use crate::overlay::{Depot, Geofence, MapCenter};
use crate::route::RouteDefinition;
use crate::vehicle::VehicleProfile;

/// The default map centre (Dhaka, Bangladesh).
pub const BASE_LOCATION: MapCenter = MapCenter {
    lat: 23.8103,
    lng: 90.4125,
    zoom: 11,
};

/// The built-in corridor definitions.
pub fn route_definitions() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition {
            id: "airport-motijheel".to_owned(),
            name: "Hazrat Shahjalal Airport → Motijheel".to_owned(),
            color: "#2563eb".to_owned(),
            polyline: r"ugynl@__wlkDsF`EcG~A_k@nb@_]qo@qR__@uPiZsXoi@aAuByGuN}@iBaMxJsShPii@|e@i^rXuTvPm`BjnA{i@dc@wJfJqLjLgNbJoLpHiPrI_CW}Au@w@iAWkBBgB`@iAfAiBrQkJpUoNt[eWbp@of@bFwDtp@ig@l_@qX~X}UhSaPbV_SpY{Uvh@ub@pSeQdBuA|KwInm@me@`g@g`@pHcHr\eXfl@_b@h[iOxO{KrJ_HdRqOziAw`A~d@y^|V}PpLeJ`[sW|nA_`AbDgCn^iZlJ_LhHgHtf@ed@rFcG|GaK`EcJbNk`@dHcI`FqDvXuU`t@oh@ns@uj@zYwUlf@{g@zYiWrMmIpKsF~EcCzj@oSj_@eKxb@_J|s@sL`c@{A|mLq`Ax]aEhY}EbTqEdWqG~TuGzRaHlkAsc@~Q{HdIaDjHaC`G_BnLiCbLeBpUcCzX}AzKGxKF~K`@pKv@hJr@fJfA`OrC~NjDfUfHzUhK`SrK`WzQjQnP~G|H`HxIzNlUfFlJlEjKlEnMjFzPhFzRbC`LnBzLzChVpE`j@pF`o@pCxXtDdRxCrL|CzIbDzIpDtInEfIhEbIbFbId]hd@rw@baAxPtXhh@h_A`h@h~@`Ynl@vf@xrAdLlZxLlXz]nq@~k@fhApL`T`M|QdJzKtJtKdHxHdJfItS~O~ObLnTjMrY|MrXdJ`e@zKxHrAjJpAxQdBpsAjKdoAzLxbGlh@~IfA|RzB~\dD~q@nHfaAlJ~p@jIpo@xIfaCb^~WfDhb@hFt}A~Mj}Dt\vOjAtG^zyDz_@zd@`Cbz@|HrcGvj@v`BhOjzAxMtPdB`b@fEp~C|X|vAvLx[`Cr`BxNd`@xC~gApKlI^js@pJv`@~HdSnEvRjD|o@~K|d@~HbTrCha@nEzo@nHry@`ErKD|Ff@nUj@nSn@bTv@ds@lDhp@bF|eA`Ip`@~DrI|@fIjBnFhBvCbBzBrBtD|FvCzFpAdFl@|CX~CPlEC`Ea@fHyBpLeTn}@uLxf@eExNsFjNsKnUqDlIwCbI}AtGk@jEi@xFe@nKBdFNlFt@jThBhg@VbH~A`_@TxEv@rF~@lFvCpKhAx^Z|OBzKl@pKhCvd@xAp_@InBYbFHpMAnJUhGObBs@bFy@bE{@`DgApCo@rAEZ_@hAKZo@fAw@|@{@l@aAd@gAXsBNsBOmBk@aBgAoA}A]u@Yy@Q{@Iu@Eu@DmCLk@n@wBsB{DyBgD{AgA@yAoA_r@[yNa@iR}@}b@As@OcH}D}bECeIBiHFw@VsB`@yA~HmCrBs@fs@aPxBo@|jCou@tWaHljAy\vNcEbjFqyA^}@d@w@jAaAtAm@zAWhB@dB\h@XzGoC~EeBb_@oKhS}Frj@aL`PyDjSqEfyAi\`Dw@vQqEvAa@jm@gM~KuCdc@}KbOuD|QaFzVyFhJwAvJ_BvEw@vl@cH`B{@nA}@dCsDnAiCdAsC^uCL_DIgKySaaAwGi^e@sFRiI}@e@s@u@c@{@WaAIgABeAXwAl@kA~@{@lAe@rAKpAJtPgQ`]o[zMgO~F_IbGqKxH{RjIuVtHaVlA}CbCoGbLkWrMqWlOoXlLoPLOdPsTbEuFtMkLvLsJdOgJrJiEdKuDvFmBlD_AtE_BtDiA|AzEp@l@jAj@~GlCzIhCvH~AjDn@|Dl@|LfAnlAl@taAtBbMBfD?pAEtBGdBEfB[vDeBtDoCdJgIlPeLdNiFjMaFdWqFdy@_I~Y}DtSmC|DgAxBcAlBsA?w@\mBv@_BjAmAb@{DD}ADwDScGa@wEi@mKc@wKQwI@}ZTk`@RiOa@mi@_@sUyBqb@mB{b@_@_PWuG?uTPyr@B_SNcZ_@a]iB}y@g@_LeAkV_@{HGkKToPvAgTz@cFdAeFzBkGtQwa@pYil@dN_YnH{OzBuEvGlDxX`OtKmW"
                .to_owned(),
            average_speed_kmh: 42.0,
            origin_label: "Hazrat Shahjalal Intl Airport".to_owned(),
            destination_label: "Motijheel Commercial Area".to_owned(),
        },
        RouteDefinition {
            id: "mirpur-secretariat".to_owned(),
            name: "Mirpur DOHS → Bangladesh Secretariat".to_owned(),
            color: "#0f766e".to_owned(),
            polyline: r"}x~ll@e}mjkD~Fjr@n`@sFh]iD~@QrKsBpNkChJiBnE}@dDm@xPsDrAUbOmC~Ck@hAStCg@lJeBzL}BjIuAbKiBpJcBpDq@rEy@tJeBhGgAtUeEdJaBjM_CnOoCp_@{G|_@_Hv_@wGzQaDfKqBxMsBfOkCt^mGbHmA~^qG~OqE`^}GrEZ|Ds@jSmDd_@qGpIyAhReDfCc@jLqBhB[jDm@dDm@p@Mt\wG~_@}G~`@}Hd^}Fho@_MbUwEHeBf@{A~@gAiEoXgAwWRmSfCs]nGoc@xAuPfHgi@fDsUxLay@n@cEv@kHtHig@zAyFfIwZlKoVhPkZbYa`@xQeXzGcJdNoPbEaFpPqSlAsAdAmAr^md@x[ia@vlAo_Bzk@yu@|NqWxSeb@zIaTpQ{g@jTat@vUsw@xh@olBvJif@dC}K^q@~@m@zAUv@KlBElPYbPa@vCQtRoAhMeB`TkE`^{D|[mCbAKfPwA|^iDt^sDx]mDvRq@|MTdMbAtIXtIj@rk@`CxJb@bWHnJu@xYaCxCm@jC{Ah@}A\eAi@}RIsC]aHWqEiA{SS}D{B{a@AeFAmCDg@v@}H|[}cBH{FpDtAppA|]rHzAvQdCxDd@lZnCtRpBrL~A~LhC~MrCz_Cdl@xQvEdo@jNnTzDfQzC~Q~AzUzAj_@hAzy@z@bz@dAlfAcAf\{Af\gCb}@{FfeByLbCQ|FaAxBo@rEsAl@Xv@J|DQlxAuJtNGbSbArRdBz_@bD~kA`NlD`@nCZj\nErh@lEjL~@fU~AtUxBdIz@lEn@hIlBbKx@~BPrd@hDpUl@bSVje@jBnOVrPTn^t@vBErNWtBE|Ni@`M]vL@rDEvS]h]gBzJm@xXqAdj@kCtn@cE|x@qIhOaCzj@yIxDcAbDwA~HmCrBs@fs@aPxBo@|jCou@tWaHljAy\vNcEbjFqyA^}@d@w@jAaAtAm@zAWhB@dB\h@XzGoC~EeBb_@oKhS}Frj@aL`PyDjSqEfyAi\`Dw@vQqEvAa@jm@gM~KuCdc@}KbOuD|QaFzVyFhJwAvJ_BvEw@vl@cHhFg@tO{ApD_@dFc@tR_BzGUhGIlEThOlAnOt@fSj@`Pd@zSXn^h@bJl@dO|@jBJfBTn_@pE~Dt@jJhArRnBlMzArBHzOl@fIXnXVvDDrIN`A@hf@I~c@IdTSzu@yDhLkAvEcAdA{@rAe@zYyW`MuN~MgM`CcC"
                .to_owned(),
            average_speed_kmh: 35.0,
            origin_label: "Mirpur DOHS".to_owned(),
            destination_label: "Bangladesh Secretariat".to_owned(),
        },
        RouteDefinition {
            id: "narayanganj-gulshan".to_owned(),
            name: "Narayanganj River Port → Gulshan 2".to_owned(),
            color: "#9333ea".to_owned(),
            polyline: r"qf{`l@_hzrkDC{Am@uDa@}@aAo@iMIoCUyYz@`Ffj@|A`LbK|m@rNxu@lDzL~CfH|BPjBjAj@z@\dAJjAAjAShAk@pAaA~@cDrFmGtU_@lEuAdc@aAfI_DvZ}Ir]{AjCgJzf@}Gfc@gKfp@kL`e@wDzKsNza@}Mr^_BjEmNjc@cDlI_KlWwKl]gDfKiF~QwJvY{M~a@aR|e@{Qnd@cNhc@oGbTmC|IuCjNwArPyAx[aCra@wD~[uSj}@yJ`_@w@pC}HjW}FdPuFzQcMna@oHt[}AfHaDzM{Hd[wFjXyG|[aHj^uAfFcHjWgDtL{GfVi@bBwPvi@mQra@iJfQiBvDa]~j@gLzSkFpJaN|DoHvBg[vGob@~Iq\bIoa@nMm_@`KqQlFiFjAyNxEsJtC{IpCwQtGwDxAea@~OmE`B{NxEcOlFcQzGsV`K}UnI{EhA_G`B}FrAsOpDiWzEuWpAsP`AsPFgQh@qVv@uq@xGwFv@qObH_ErFoYjb@aKvNqd@zk@}JfKwOzP{IvKsHxGcDvBoBhAgE~AoCr@wGvAsTxDg[fFuLtBeJzCuL~DmMfG}NpKoCtB}BjC_KjKyXn_@oPxPc[bZ{QbOsT`Lga@bR}\|Q{g@x\ue@t\em@n\g_@xWoVhUuTrVmQfRgOrPyGvHeWfUwM`Kid@fa@us@pm@oZxWeP~LcE~EcVlSiQbSySzUmT|WcVdZ}T~XaLfMuVfV{TvSgNtLkYjU_OrPcTzPgIvF_JnGoDpEuH`LwGpMiDzHaD|GcC~CqEjDqFnDaLfFmNjFiUhImQ|G{a@xNmj@xX{\tQiQhRmYj\ch@|l@uZx\w`@j]ac@~]c^vYa\|_@gYxYcMpH_MtBeZnBy^j@wKNwNhBi[zEs`@~L{ZrOeN`LsIbHyUbSu^~ZqgA~fA_NlSqG~G{IjJgMfM{MfM{K~H{GzFgCpCcDvEkDnFa]tf@wCtGiC`EiNdSaX`^wJlMaG~HsQjTsElHiClDkHvJim@`y@wDfFyLhNaErF{Yfc@{pAhmB{Wnb@wHjMsKjOwGtHeI~GkOxGkHpCoI~AmJ~AaCReV~@wO|BqKpCsOhCyQfHaT~EcGtC_NdJmAnBwJvOm\bi@_HbIyKfMoBzBeBtAsKpK_IrKsF|FyDlEsYdYcf@pb@aF~FmN~MwS~RoJbJwDrGaBrBgBhBu^~]_A`AyBrBaAmAiFmH{BaCsCuCaZ}\cIkKwCwG}CkM_@eAcB{EoCqHsD{HoCaFuKsPuVkb@iTwc@oAuByWm_@}JsK{JkJsM}JcN}HaN{GuC_BCCC?oBo@uRiGeV_HsRuF}RoE}MuA_P}@_Pe@kMOuXb@_t@tEiCTiu@tGaRhAkOzCsF`A_Gd@sVxBeXt@ej@hEgH|@iEb@oi@xDiFd@aKbASH{BLkAMu@Su@a@k@e@g@m@gGt@wStBoMdB}d@pDyb@pC{i@~B}_@|BgmB|KkLd@sWh@wYf@iXLyFHsDh@iFjAwD|AkE~B_EfD}AhBwBxCsBnEqCdLwCjLuD~NgJtj@yTteAwE~VaCbMuCtLwEjO{EbMcJhR}o@fjAkO~Wc{A|cCeM|S_GrMaGpRgC`OsIvZqHdWcD`JqFfMqItOyRv[uE`JaDfI_CzHiBlLgA`Kk@tKqAbR_BvKuBjJyCdJcD~IeBxEsD|EeGdG_EzDwEtDeDrBeSzKe]`RkWnNuUrKg|@r_@{TfKcObImQnLaQjMiQzOyMhRcPnR{FdIuDdGsQz[_E`GsIlPmLnUsHdT}C~I_CtI}@nDmCdMqAlH}@vHoBjSm@bI[~FMpFMpG?`IPza@b@|ZX|MHjHCrI[t[OnNKtPW|PaBjy@iCpuA_Axs@YhYm@zZ}@ji@e@~WoBfhAc@jKg@tHwH|r@aD~RYlBu@pFmGzn@sCj`@_Dfm@_@pBF`@C^K^SV[N]B]E[OSWaDUcDBeDVqDXmCj@aFxAcF`BoEhCiE`C}a@|`@uT`Tg]`[{^hZic@b`@wDfE{L~L}E~Eo`@t`@}@~@kGxGel@zi@kItIcEhEk@j@wD|DsdAfDsRtAeKbA_a@`DkOfAaGeB_Cy@mCkAaDmBaEoDkBcD}BoF?vAStAe@lAc@l@k@d@o@\s@TiAJoAE_AWaAi@u@w@g@cAYkA}DnAmDRaWnAay@hBqmAWeCG{\_@wSSkKm@mx@wHa_@iFiBUmBM}YqAoGKuFGaT?{Vw@g@?eCImXYc]qAmIAuJJ_PdAkHl@aEn@ym@rGiWjDgKjBw[xGaU~FgMvCm`@vJ}_@tHcS~DmW`FyN~DyCt@go@`OknAxWa~@nUoZpJmPpG?vBSzAe@tAu@hAaA|@mAj@sAXkBBiB[}Au@mAoAw@aBa@}B?aCb@}B^}@d@w@jAaAgAcGqEmVcHm^aA{GqCuRyH_a@aCiK}Swp@sk@izA}A{C{q@mjAmQwYmGuLaRy]iC}JwCoJqCaHsDuKmGqOiDgIuA}CiA}BqByBaBuAoBuA{CeCyCiBiDyAqJ_CcDw@sF}@wHw@kDQoBMyCGy]bAsBOiE_@yDq@oD}@mDoAoBoAuBkBuCgDsAkBcDaIiCwFcBuEoA}BsAeB_AaAaB{@eCeA{FkBiI}BiF_AeDe@qD[mEa@cCc@wCk@_Du@iC_AeFkBuEyBaHgDaBkAkPyOiJcIsBiBkByAsAuAmAcBeAqBeO}UiCoEcDqEwBoCkCaDsBiCaByBcB{BwAeCwDkHcJeQuDyGuEwHwNeWcEmHkDoFmCeEeEwFaDmEoOaQaRqPaCoByCiCgA_AiA_AqCkCiEaE_BoAIKqAeAkI}H}KmLsRySeO{PsFyFuJuJ{EsE{@y@iE}CaJcGcFkDuBkB{EgEm@i@eFsEgFwEkIgHkGwEsMaKwIgGyD{B{DgBoFgBoFcBaGwAeGiA{HuAgBU_BK{ADiCN{ARkAh@wBl@}BxAuCtBmCdCsBxAqDlD}BvBkBpB_BlBsClE_CtD_FfJiC`FaBpDoD|HqD~J_ClEgCfFqHbGyEpDkClCaHbHuCdCsBfAsIrBkD`@kF`AuHvAoDNgCG_CGyBa@wBi@cBy@gCaB}B{AiCwBqB{B{AcBkBgCq@yAu@uBo@_Ck@_Ea@iF_@iIIgKGeEByCHqDTsCb@oCr@}CpAkDr@cBpA{ChAaC~@_ClAcCjAaEfAoGx@wFb@eG?yDa@sJg@oGm@sFMiBg@iDiAsDaBaE_BoCq@{@mDuCuDwBmJeDiHeC{E{AiGgB}F{AaKwBuE}@sGaAsKkAoJs@aO_@wJ?{CTmCPwEl@wF|@qGfAqFbAoCd@mVqv@wLmb@oNgb@qK_[_D{HsCcGyEkH_EkEy@u@eE_E}FcEiAy@gGsCcM}CiOqBqNuBo`@iCyf@wCcpA}GqsAaIeEYwTuAmr@sDkUgAmHc@mEi@kEBeQtA}Cn@gPfEeGd@a_@}@wj@mD_ViAow@mEu]cCoV_Age@T_ORmQTaw@tAeU`@oCHgIv@ePpAw]zDeX`Eyc@nF{Y|Dkr@bLoAToMtCsKtCcQtEaM~Bk[lIi\`JuAXguA|_@oSbFge@dNgV~GxBbF"
                .to_owned(),
            average_speed_kmh: 48.0,
            origin_label: "Narayanganj River Port".to_owned(),
            destination_label: "Gulshan 2".to_owned(),
        },
    ]
}

/// The built-in vehicle profiles.
pub fn vehicle_profiles() -> Vec<VehicleProfile> {
    vec![
        VehicleProfile {
            callsign: "VT-201".to_owned(),
            license_plate: "DHA-2013".to_owned(),
            device_id: "VTMS-DHK-201".to_owned(),
            driver: "Rahim Khan".to_owned(),
            vehicle_type: "Refrigerated Truck".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-202".to_owned(),
            license_plate: "DHA-5194".to_owned(),
            device_id: "VTMS-DHK-202".to_owned(),
            driver: "Shila Akter".to_owned(),
            vehicle_type: "Box Van".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-203".to_owned(),
            license_plate: "DHA-8821".to_owned(),
            device_id: "VTMS-DHK-203".to_owned(),
            driver: "Nazmul Islam".to_owned(),
            vehicle_type: "Flatbed".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-204".to_owned(),
            license_plate: "DHA-3307".to_owned(),
            device_id: "VTMS-DHK-204".to_owned(),
            driver: "Farzana Chowdhury".to_owned(),
            vehicle_type: "Tanker".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-205".to_owned(),
            license_plate: "DHA-7742".to_owned(),
            device_id: "VTMS-DHK-205".to_owned(),
            driver: "Masud Karim".to_owned(),
            vehicle_type: "Mini Truck".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-206".to_owned(),
            license_plate: "DHA-4410".to_owned(),
            device_id: "VTMS-DHK-206".to_owned(),
            driver: "Sadia Rahman".to_owned(),
            vehicle_type: "Delivery Van".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-207".to_owned(),
            license_plate: "DHA-9145".to_owned(),
            device_id: "VTMS-DHK-207".to_owned(),
            driver: "Tariq Ahmed".to_owned(),
            vehicle_type: "Covered Van".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-208".to_owned(),
            license_plate: "DHA-6259".to_owned(),
            device_id: "VTMS-DHK-208".to_owned(),
            driver: "Mitu Sultana".to_owned(),
            vehicle_type: "SUV".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-209".to_owned(),
            license_plate: "DHA-7034".to_owned(),
            device_id: "VTMS-DHK-209".to_owned(),
            driver: "Abid Hossain".to_owned(),
            vehicle_type: "Motorbike".to_owned(),
        },
        VehicleProfile {
            callsign: "VT-210".to_owned(),
            license_plate: "DHA-5528".to_owned(),
            device_id: "VTMS-DHK-210".to_owned(),
            driver: "Shamima Rupa".to_owned(),
            vehicle_type: "Pickup".to_owned(),
        },
    ]
}

/// The built-in geofenced zones.
pub fn geofences() -> Vec<Geofence> {
    vec![
        Geofence {
            id: "motijheel-delivery-zone".to_owned(),
            name: "Motijheel Delivery Zone".to_owned(),
            color: "#f97316".to_owned(),
            points: vec![
                LatLng::new(23.733, 90.413),
                LatLng::new(23.733, 90.425),
                LatLng::new(23.722, 90.425),
                LatLng::new(23.722, 90.412),
            ],
        },
        Geofence {
            id: "gulshan-priority".to_owned(),
            name: "Gulshan Priority Service Area".to_owned(),
            color: "#10b981".to_owned(),
            points: vec![
                LatLng::new(23.798, 90.408),
                LatLng::new(23.806, 90.420),
                LatLng::new(23.798, 90.432),
                LatLng::new(23.790, 90.420),
            ],
        },
    ]
}

/// The built-in depots.
pub fn depots() -> Vec<Depot> {
    vec![
        Depot {
            id: "uttara-hub".to_owned(),
            name: "Uttara Logistics Hub".to_owned(),
            capacity: 52,
            location: LatLng::new(23.874, 90.398),
        },
        Depot {
            id: "tejgaon-yard".to_owned(),
            name: "Tejgaon Service Yard".to_owned(),
            capacity: 38,
            location: LatLng::new(23.766, 90.400),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline;

    #[test]
    fn preset_geometry_decodes() {
        for definition in route_definitions() {
            let points = polyline::decode(&definition.polyline).unwrap();
            assert!(points.len() > 100, "{} is suspiciously short", definition.id);
            // All of Dhaka sits in a tight bounding box.
            for point in points {
                assert!((23.0..25.0).contains(&point.lat));
                assert!((90.0..91.0).contains(&point.lng));
            }
        }
    }

    #[test]
    fn preset_fleet_is_consistent() {
        let profiles = vehicle_profiles();
        assert_eq!(profiles.len(), 10);
        let devices: std::collections::HashSet<_> =
            profiles.iter().map(|p| p.device_id.clone()).collect();
        assert_eq!(devices.len(), profiles.len());
    }
}
